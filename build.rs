///
/// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
///
/// Licensed under the Apache License, Version 2.0 (the "License").
/// You may not use this file except in compliance with the License.
/// A copy of the License is located at
///
///  http://aws.amazon.com/apache2.0
///
/// or in the "license" file accompanying this file. This file is distributed
/// on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
/// express or implied. See the License for the specific language governing
/// permissions and limitations under the License.
///
use std::env;
use std::fs::File;
use std::io::Write;

const SP: u8 = b' ';
const DEL: u8 = 0x7f;
const TCHAR: &[u8] = b"-_.!#$%&'*+^`|~";

fn format_char(b: u8) -> String {
    use std::fmt::Write;

    let mut str = String::new();
    match b {
        b'\r' => str.push_str("\\r"),
        b'\n' => str.push_str("\\n"),
        b'\t' => str.push_str("\\t"),
        _ if (SP..DEL).contains(&b) => {
            str.push(b as char);
        }
        _ => {
            write!(str, "\\{:#04x}", b).expect("Writing to strings is infallible");
        }
    };
    str
}

fn generate_table(name: &str, predicate: fn(u8) -> bool) -> String {
    use std::fmt::Write;

    let mut t = String::new();
    write!(t, "pub static {}: [bool; 256] = [\r\n    ", name).ok();
    for i in 0..=255_u8 {
        write!(t, " {} /* {} */,", (predicate)(i), format_char(i)).ok();
        if i % 4 == 3 {
            write!(t, "\r\n    ").ok();
        }
    }
    write!(t, "];\r\n").ok();
    t
}

/// Code points below U+0100 that the default classifier accepts.
/// Everything in Latin-1 is an assigned code point, so only the
/// C0 controls, DEL and the C1 controls are rejected.
fn is_safe_latin1(b: u8) -> bool {
    !(b < 0x20 || b == DEL || (0x80..=0x9f).contains(&b))
}

fn is_rfc_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || TCHAR.contains(&b)
}

type TableGenerator = fn(u8) -> bool;

fn generate_lookup_tables() {
    use std::fmt::Write;

    let tables: &[(&str, TableGenerator)] = &[
        ("SAFE_LATIN1", |b| is_safe_latin1(b)),
        ("TCHAR_TABLE", |b| is_rfc_tchar(b)),
    ];

    let mut char_tables = String::new();
    for table in tables {
        write!(char_tables, "{}", generate_table(table.0, table.1))
            .expect("Writing to strings is infallible");
    }
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR variable is not set");
    let mut file =
        File::create(format!("{}/char_tables.rs", out_dir)).expect("Cannot open file for writing");
    file.write_all(char_tables.as_bytes())
        .expect("Cannot write to file");
}

fn main() {
    generate_lookup_tables();
}
