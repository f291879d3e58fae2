//! The plainfields text format.
//!
//! This module only holds documentation. It describes the format as this
//! crate reads and writes it.
//!
//! # Documents
//!
//! A document is a flat, comma-separated sequence of fields:
//!
//! ```text
//! john, 30, ^admin, !guest, name="John Doe", tags=dev;prod, limits=cpu:2;mem:512
//! ```
//!
//! Each field is one of:
//!
//! | form           | example              | meaning                              |
//! |----------------|----------------------|--------------------------------------|
//! | ordered value  | `john`               | positional value                     |
//! | enable         | `^admin`             | `admin` is `true`                    |
//! | disable        | `!guest`             | `guest` is `false`                   |
//! | assignment     | `name=john`          | labeled scalar                       |
//! | list           | `tags=dev;prod`      | labeled list of scalars              |
//! | pairs          | `limits=cpu:2;mem:4` | labeled map of scalar pairs          |
//! | empty          | `name=` or `,`       | an omitted value, read as zero       |
//!
//! Ordered values must come before every labeled field. Once a labeled field
//! has been read, a bare value fails with `ordered value not allowed here`.
//! [`ParseOptions::strict`](crate::ParseOptions::strict) rejects ordered
//! values altogether.
//!
//! Whitespace (space, tab, `\n`, `\r`) between tokens is ignored. Empty input
//! is an empty document.
//!
//! # Grammar
//!
//! ```text
//! document   = [ field { "," field } ] ;
//! field      = ( ( "^" | "!" ) identifier ) | ( identifier "=" [ rhs ] ) | [ content ] ;
//! content    = value [ ( ":" value pairs ) | list ] ;
//! rhs        = content | ( ( "^" | "!" ) identifier pairs ) ;
//! pairs      = { ";" ( value ":" value | ( "^" | "!" ) identifier ) } ;
//! list       = ";" value { ";" value } ;
//! value      = identifier | number | string | "true" | "false" | "nil" ;
//! ```
//!
//! A trailing `,` at the end of the input is accepted.
//!
//! # Scalars
//!
//! ## Identifiers
//!
//! A letter followed by letters, digits, `-` or `_`. Letters are any Unicode
//! alphabetic character. `true`, `false` and `nil` are keywords.
//!
//! ## Strings
//!
//! Quoted with `"` or `'`; the closing quote must match the opening one. A
//! backslash escapes the next character. Escapes are interpreted when the
//! value is converted to text:
//!
//! | escape          | meaning                          |
//! |-----------------|----------------------------------|
//! | `\n` `\r` `\t`  | newline, carriage return, tab    |
//! | `\b` `\f` `\v` `\a` | backspace, form feed, vertical tab, bell |
//! | `\\` `\"` `\'`  | the character itself             |
//! | `\xHH`          | code point `HH` (hex)            |
//! | `\uHHHH`        | code point `HHHH` (hex)          |
//! | `\UHHHHHHHH`    | code point `HHHHHHHH` (hex)      |
//! | `\OOO`          | code point `OOO` (octal, at most `\377`) |
//!
//! ## Numbers
//!
//! ```text
//! 42   -7   +3   1_000   3.14   6.02e23   1E-9
//! 0x1F   0o17   0b1010   -0x10
//! 0x23.1   0x1.8p1   0x1p-2
//! ```
//!
//! An optional sign comes first. `0x`, `0o` and `0b` select hex, octal and
//! binary; other numbers are decimal. `_` may separate digits anywhere in a
//! digit run. Hex numbers may carry a fraction and a binary exponent
//! (`p`/`P`), decimal numbers a fraction and a decimal exponent (`e`/`E`).
//! A decimal point needs a digit on at least one side (`-.5` and `1.` are
//! numbers, `-.` is an error). Hex floats round to the nearest `f64`.
//!
//! # Quoting on output
//!
//! [`needs_quoting`](crate::needs_quoting) reports text that is empty,
//! contains a space or any of `,;:=\`, or is one of the keywords. The
//! [`Builder`](crate::Builder) also quotes text whose bare form would not scan
//! back as a single identifier or number, so written documents always parse
//! back to the same text.
//!
//! # Errors
//!
//! Lexing and parsing stop at the first problem. The event stream then ends
//! with one [`ParserEvent::Error`](crate::ParserEvent::Error) carrying the
//! position and a message such as:
//!
//! ```text
//! unexpected character: U+0040 '@'
//! unterminated string
//! expected hex digit
//! expected digit after exponent
//! expected value, got EOF
//! expected FieldSeparator, got Number
//! ordered value not allowed here
//! ```
