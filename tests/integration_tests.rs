use plainfields::{
    from_reader, from_slice, from_str, from_str_with_options, to_builder, to_string,
    to_string_with_options, to_writer, BuilderOptions, Document, Error, Node, ParseOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Database {
    host: String,
    port: u16,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Server {
    name: String,
    port: u16,
    db: Database,
    limits: BTreeMap<String, u32>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Mode {
    Fast,
    Limit(u32),
    Span(u8, u8),
    Named { low: u8, high: u8 },
}

fn alice() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    }
}

#[test]
fn test_simple_struct() {
    let user = alice();

    let text = to_string(&user).unwrap();
    assert_eq!(text, "id=123,name=Alice,^active,tags=admin;developer");

    let user_back: User = from_str(&text).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_pairs() {
    let server = Server {
        name: "api".to_string(),
        port: 8080,
        db: Database {
            host: "db.internal".to_string(),
            port: 5432,
        },
        limits: BTreeMap::from([("cpu".to_string(), 2), ("mem".to_string(), 512)]),
    };

    let text = to_string(&server).unwrap();
    assert_eq!(
        text,
        r#"name=api,port=8080,db=host:"db.internal";port:5432,limits=cpu:2;mem:512"#
    );

    let back: Server = from_str(&text).unwrap();
    assert_eq!(server, back);
}

#[test]
fn test_positional_fields() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Login {
        user: String,
        port: u16,
        #[serde(default)]
        verbose: bool,
        #[serde(default)]
        hosts: Vec<String>,
    }

    let login: Login = from_str("root, 0x16, ^verbose, hosts=a;b").unwrap();
    assert_eq!(
        login,
        Login {
            user: "root".to_string(),
            port: 22,
            verbose: true,
            hosts: vec!["a".to_string(), "b".to_string()],
        }
    );

    let login: Login = from_str("guest, 2_222").unwrap();
    assert_eq!(login.port, 2222);
    assert!(!login.verbose);
    assert!(login.hosts.is_empty());

    let err = from_str::<Login>("a, 1, ^verbose, hosts=x, extra").unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
}

#[test]
fn test_enums() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Run {
        mode: Mode,
        limit: Mode,
    }

    let run = Run {
        mode: Mode::Fast,
        limit: Mode::Limit(5),
    };
    let text = to_string(&run).unwrap();
    assert_eq!(text, "mode=Fast,limit=Limit:5");
    assert_eq!(from_str::<Run>(&text).unwrap(), run);

    for mode in [
        Mode::Fast,
        Mode::Limit(9),
        Mode::Span(1, 2),
        Mode::Named { low: 3, high: 7 },
    ] {
        let text = to_string(&mode).unwrap();
        assert_eq!(from_str::<Mode>(&text).unwrap(), mode, "via {text}");
    }

    assert_eq!(from_str::<Mode>("\"Fast\"").unwrap(), Mode::Fast);
    assert!(from_str::<Mode>("Slow").is_err());
}

#[test]
fn test_options() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Profile {
        nickname: Option<String>,
        age: Option<u8>,
    }

    let empty = Profile {
        nickname: None,
        age: None,
    };
    let text = to_string(&empty).unwrap();
    assert_eq!(text, "nickname=nil,age=nil");
    assert_eq!(from_str::<Profile>(&text).unwrap(), empty);

    let full = Profile {
        nickname: Some("nil".to_string()),
        age: Some(41),
    };
    let text = to_string(&full).unwrap();
    assert_eq!(text, r#"nickname="nil",age=41"#);
    assert_eq!(from_str::<Profile>(&text).unwrap(), full);

    let omitted: Profile = from_str("nickname=,age=").unwrap();
    assert_eq!(omitted, empty);

    assert_eq!(from_str::<Option<u8>>("").unwrap(), None);
    assert_eq!(from_str::<Option<u8>>("nil").unwrap(), None);
    assert_eq!(from_str::<Option<u8>>("7").unwrap(), Some(7));
}

#[test]
fn test_empty_collections() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Bag {
        items: Vec<u32>,
        labels: BTreeMap<String, String>,
    }

    let bag = Bag {
        items: vec![],
        labels: BTreeMap::new(),
    };
    let text = to_string(&bag).unwrap();
    assert_eq!(text, "items=,labels=");
    assert_eq!(from_str::<Bag>(&text).unwrap(), bag);

    let single = Bag {
        items: vec![4],
        labels: BTreeMap::from([("k".to_string(), "v".to_string())]),
    };
    let text = to_string(&single).unwrap();
    assert_eq!(text, "items=4,labels=k:v");
    assert_eq!(from_str::<Bag>(&text).unwrap(), single);
}

#[test]
fn test_special_strings() {
    let cases = [
        "",
        "hello world",
        "a,b",
        "x;y",
        "k:v",
        "a=b",
        "true",
        "false",
        "nil",
        "123",
        "-0x1F",
        "say \"hi\"",
        "it's",
        "back\\slash",
        "line1\nline2",
        "tab\there",
        "\u{1}control",
        "caf\u{e9}",
        "\u{1F600}",
        "^admin",
        "!guest",
        " padded ",
    ];

    for case in cases {
        let user = User {
            id: 1,
            name: case.to_string(),
            active: false,
            tags: vec![case.to_string(), "plain".to_string()],
        };
        let text = to_string(&user).unwrap();
        let back: User = from_str(&text).unwrap();
        assert_eq!(user, back, "via {text}");
    }
}

#[test]
fn test_numbers() {
    assert_eq!(from_str::<u8>("0xff").unwrap(), 255);
    assert_eq!(from_str::<i16>("-0b101").unwrap(), -5);
    assert_eq!(from_str::<u32>("0o777").unwrap(), 511);
    assert_eq!(from_str::<u64>("1_000_000").unwrap(), 1_000_000);
    assert_eq!(from_str::<i64>("+42").unwrap(), 42);
    assert_eq!(from_str::<f64>("0x1.8p1").unwrap(), 3.0);
    assert_eq!(from_str::<f64>("0x23.1").unwrap(), 35.0625);
    assert_eq!(from_str::<f64>("6.02e23").unwrap(), 6.02e23);
    assert_eq!(from_str::<f32>("0.5").unwrap(), 0.5);

    let err = from_str::<u8>("256").unwrap_err();
    assert_eq!(err.to_string(), "Error: 256 is out of range for u8");

    assert!(from_str::<u32>("-1").is_err());
    assert!(from_str::<i32>("1.5").is_err());
    assert!(from_str::<i32>("abc").is_err());

    assert_eq!(to_string(&-17i64).unwrap(), "-17");
    assert_eq!(to_string(&2.5f64).unwrap(), "2.5");
    assert_eq!(to_string(&u64::MAX).unwrap(), "18446744073709551615");
    assert!(matches!(
        to_string(&f64::INFINITY).unwrap_err(),
        Error::UnsupportedType(_)
    ));
}

#[test]
fn test_syntax_errors() {
    let err = from_str::<HashMap<String, String>>("name=john,123").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error at Col 11 (Offset 10): ordered value not allowed here"
    );

    let err = from_str::<User>("id=1,name=\"open").unwrap_err();
    assert!(err.to_string().ends_with("unterminated string"));

    let err = from_str::<User>("id=1,@").unwrap_err();
    assert!(err.to_string().contains("unexpected character: U+0040 '@'"));
}

#[test]
fn test_strict_mode() {
    let err = from_str_with_options::<Vec<u8>>("1,2", ParseOptions::strict()).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));

    let user: User =
        from_str_with_options("id=5,name=x,!active,tags=", ParseOptions::strict()).unwrap();
    assert_eq!(user.id, 5);
    assert!(user.tags.is_empty());
}

#[test]
fn test_spaced_output() {
    let user = alice();
    let text = to_string_with_options(&user, BuilderOptions::spaced()).unwrap();
    assert_eq!(text, "id = 123, name = Alice, ^active, tags = admin; developer");
    assert_eq!(from_str::<User>(&text).unwrap(), user);

    let quoted = BuilderOptions::default().with_always_quote_strings(true);
    let text = to_string_with_options(&user, quoted).unwrap();
    assert_eq!(text, r#"id=123,name="Alice",^active,tags="admin";"developer""#);
    assert_eq!(from_str::<User>(&text).unwrap(), user);
}

#[test]
fn test_builder_extension() {
    let mut builder = to_builder(&alice(), BuilderOptions::default()).unwrap();
    builder.labeled("team", "core").unwrap();
    builder.pairs("quota", [("cpu", 4), ("disk", 100)]).unwrap();

    let text = builder.build();
    assert_eq!(
        text,
        "id=123,name=Alice,^active,tags=admin;developer,team=core,quota=cpu:4;disk:100"
    );

    let doc = Document::parse(&text).unwrap();
    let quota = doc.get("quota").and_then(Node::as_map).unwrap();
    assert_eq!(quota.len(), 2);
}

#[test]
fn test_reader_writer_slice() {
    let user = alice();

    let mut buffer = Vec::new();
    to_writer(&mut buffer, &user).unwrap();
    assert_eq!(buffer, b"id=123,name=Alice,^active,tags=admin;developer");

    let from_bytes: User = from_slice(&buffer).unwrap();
    assert_eq!(from_bytes, user);

    let from_io: User = from_reader(buffer.as_slice()).unwrap();
    assert_eq!(from_io, user);

    let invalid = [b'a', b'=', 0xff];
    assert!(from_slice::<User>(&invalid).is_err());
}

#[test]
fn test_borrowed_fields() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Borrowed<'a> {
        name: &'a str,
        quoted: &'a str,
    }

    let input = r#"name=alice,quoted="hello world""#;
    let value: Borrowed = from_str(input).unwrap();
    assert_eq!(
        value,
        Borrowed {
            name: "alice",
            quoted: "hello world"
        }
    );
}

#[test]
fn test_self_describing() {
    let value: serde_json::Value = from_str("john, 30, ^admin, tags=a;b, db=port:5432").unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "0": "john",
            "1": 30,
            "admin": true,
            "tags": ["a", "b"],
            "db": { "port": 5432 }
        })
    );

    let value: serde_json::Value = from_str("1, -2, 2.5").unwrap();
    assert_eq!(value, serde_json::json!([1, -2, 2.5]));

    let value: serde_json::Value = from_str("").unwrap();
    assert_eq!(value, serde_json::Value::Null);
}

#[test]
fn test_document_outlives_input() {
    let doc = {
        let input = String::from("first, second, ^on, list=1;2;3, map=k:v");
        Document::parse(&input).unwrap().into_owned()
    };

    assert_eq!(doc.ordered().len(), 2);
    assert_eq!(doc.labeled().len(), 3);
    assert!(doc.get("on").and_then(Node::as_value).unwrap().to_bool().unwrap());
    assert_eq!(doc.get("list").and_then(Node::as_list).unwrap().len(), 3);
    assert!(doc.get("map").and_then(Node::as_map).unwrap().contains_key("k"));
}
