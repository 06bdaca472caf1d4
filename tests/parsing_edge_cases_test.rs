use tinyconf::{Config, ConfigDocument, LineParser, ParsedLine};

fn load(text: &str) -> Config {
    Config::from(ConfigDocument::from_text(text).to_store())
}

#[test]
fn test_escaped_separator_in_key() {
    let config = load(r"a\=b=c");
    assert_eq!(config.get_raw("a=b"), Some("c"));
    assert_eq!(config.len(), 1);
}

#[test]
fn test_split_at_first_separator() {
    let config = load("expr = x=y=z");
    assert_eq!(config.get_raw("expr"), Some("x=y=z"));
}

#[test]
fn test_quoted_values_keep_specials() {
    let config = load(
        "url = \"http://host/?q=1#frag\"\n\
         list = 'a;b;c'\n\
         padded = \"  both ends  \"\n",
    );
    assert_eq!(config.get_raw("url"), Some("http://host/?q=1#frag"));
    assert_eq!(config.get_raw("list"), Some("a;b;c"));
    assert_eq!(config.get_raw("padded"), Some("  both ends  "));
}

#[test]
fn test_quoted_key() {
    let config = load("\"spaced key\" = 1");
    assert_eq!(config.get::<i32>("spaced key").unwrap(), Some(1));
}

#[test]
fn test_whitespace_is_trimmed() {
    let config = load("\t key with space \t=\t value with space \t");
    assert_eq!(config.get_raw("key with space"), Some("value with space"));
}

#[test]
fn test_sections_and_default_reset() {
    let config = load("top=0\n[ Net ]\nport=1\n[]\nback=2\n[Ui]\ntheme=dark\n");
    assert_eq!(config.get_raw("top"), Some("0"));
    assert_eq!(config.get_raw("Net:port"), Some("1"));
    assert_eq!(config.get_raw("back"), Some("2"));
    assert_eq!(config.get_raw("Ui:theme"), Some("dark"));
}

#[test]
fn test_escaped_colon_stays_in_default_section() {
    let config = load(r"a\:b=1");
    assert_eq!(config.get_raw(r"a\:b"), Some("1"));
    assert!(!config.exists("a:b"));
}

#[test]
fn test_lines_without_association() {
    let config = load("just some words\n=orphan\n   \n[Broken\nok=yes\n");
    assert_eq!(config.keys(), vec!["ok"]);
}

#[test]
fn test_empty_value() {
    let config = load("empty=\nspaced =   \n");
    assert_eq!(config.get_raw("empty"), Some(""));
    assert_eq!(config.get_raw("spaced"), Some(""));
}

#[test]
fn test_duplicate_keys_last_wins() {
    let config = load("k=1\n[S]\nk=2\n[]\nk=3\n");
    assert_eq!(config.get_raw("k"), Some("3"));
    assert_eq!(config.get_raw("S:k"), Some("2"));
}

#[test]
fn test_unicode() {
    let config = load("名前 = 値 # コメント\nemoji='🦀'\n");
    assert_eq!(config.get_raw("名前"), Some("値"));
    assert_eq!(config.get_raw("emoji"), Some("🦀"));
}

#[test]
fn test_unclosed_quote_is_literal() {
    let config = load("say = it's fine");
    assert_eq!(config.get_raw("say"), Some("it's fine"));
}

#[test]
fn test_value_span_points_at_token() {
    let line = "  name =  'old'  ";
    match LineParser::parse_line(line).unwrap() {
        ParsedLine::Pair {
            value_span, quote, ..
        } => {
            assert_eq!(&line[value_span], "'old'");
            assert_eq!(quote, Some('\''));
        }
        other => panic!("expected pair, got {:?}", other),
    }
}

#[test]
fn test_type_error_on_bad_conversion() {
    let config = load("flag = yes\nnum = 1.5\n");
    assert!(config.get::<bool>("flag").is_err());
    assert!(config.get::<i32>("num").is_err());
    assert_eq!(config.get::<f32>("num").unwrap(), Some(1.5));
}
