//! Tests for the condition lexer, parser, and evaluator.

use proptest::prelude::*;

use crate::helpers::apply_indexes;
use crate::lexer::{tokenize, Token};
use crate::{Condition, ConditionSequence, EvalContextFamily, IndexExpr, ParseError, PathAccessor, PathExpr, Value};

// ============================================================================
// Test context family
// ============================================================================

struct TestContext<'a> {
    name: &'a str,
    count: i64,
    enabled: Option<bool>,
    tags: &'a [&'a str],
    attributes: &'a [(&'a str, &'a str)],
}

fn checkout() -> TestContext<'static> {
    TestContext {
        name: "checkout",
        count: 42,
        enabled: Some(true),
        tags: &["a", "b"],
        attributes: &[("env", "prod"), ("http.method", "GET")],
    }
}

struct TestFamily;

#[derive(Debug)]
enum TestPath {
    Name,
    Count,
    Enabled,
    Tags(Vec<IndexExpr>),
    Attribute(String),
}

impl EvalContextFamily for TestFamily {
    type Context<'a> = TestContext<'a>;
    type Path = TestPath;

    fn resolve_path(path: &PathExpr) -> Result<TestPath, ParseError> {
        match (path.segments().as_slice(), path.indexes.as_slice()) {
            (["name"], []) => Ok(TestPath::Name),
            (["count"], []) => Ok(TestPath::Count),
            (["enabled"], []) => Ok(TestPath::Enabled),
            (["tags"], indexes) => Ok(TestPath::Tags(indexes.to_vec())),
            (["attributes"], [IndexExpr::String(key)]) => Ok(TestPath::Attribute(key.clone())),
            (["name"] | ["count"] | ["enabled"], _) => Err(ParseError::invalid_path(path, "field cannot be indexed")),
            _ => Err(ParseError::unknown_path(path)),
        }
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        match name {
            "LEVEL_LOW" => Some(1),
            "LEVEL_HIGH" => Some(10),
            _ => None,
        }
    }
}

impl PathAccessor<TestFamily> for TestPath {
    fn get<'a>(&self, ctx: &<TestFamily as EvalContextFamily>::Context<'a>) -> Value<'a> {
        match self {
            TestPath::Name => Value::str(ctx.name),
            TestPath::Count => Value::Int(ctx.count),
            TestPath::Enabled => ctx.enabled.map_or(Value::Nil, Value::Bool),
            TestPath::Tags(indexes) => {
                let tags = ctx.tags.iter().map(|t| Value::str(t)).collect();
                apply_indexes(Value::List(tags), indexes)
            }
            TestPath::Attribute(key) => ctx
                .attributes
                .iter()
                .find(|(k, _)| k == key)
                .map_or(Value::Nil, |(_, v)| Value::str(v)),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Helper to collect tokens from input, panics on lexer error
fn collect_tokens(input: &str) -> Vec<Token<'_>> {
    tokenize(input)
        .expect("Lexer error")
        .into_iter()
        .map(|(token, _span)| token)
        .collect()
}

fn parse(condition: &str) -> Condition<TestFamily> {
    Condition::parse(condition).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", condition, e))
}

fn eval(condition: &str, ctx: &TestContext<'_>) -> bool {
    parse(condition).evaluate(ctx)
}

fn parse_err(condition: &str) -> ParseError {
    match Condition::<TestFamily>::parse(condition) {
        Ok(_) => panic!("expected {:?} to fail to parse", condition),
        Err(e) => e,
    }
}

// ============================================================================
// Lexer tests
// ============================================================================

#[test]
fn test_keywords() {
    let tokens = collect_tokens("or and not in true false nil");
    assert_eq!(
        tokens,
        vec![
            Token::Or,
            Token::And,
            Token::Not,
            Token::In,
            Token::True,
            Token::False,
            Token::Nil,
        ]
    );
}

#[test]
fn test_comparison_operators() {
    let tokens = collect_tokens("== != < > <= >=");
    assert_eq!(
        tokens,
        vec![
            Token::Eq,
            Token::NotEq,
            Token::Less,
            Token::Greater,
            Token::LessEq,
            Token::GreaterEq,
        ]
    );
}

#[test]
fn test_string_with_escape() {
    let tokens = collect_tokens(r#""hello \"world\"""#);
    assert_eq!(tokens, vec![Token::StringLiteral(r#""hello \"world\"""#)]);
}

#[test]
fn test_numeric_literals() {
    let tokens = collect_tokens("42 -10 6.18 .5");
    assert_eq!(
        tokens,
        vec![
            Token::IntLiteral(42),
            Token::Minus,
            Token::IntLiteral(10),
            Token::FloatLiteral(6.18),
            Token::FloatLiteral(0.5),
        ]
    );
}

#[test]
fn test_bytes_literal() {
    let tokens = collect_tokens("0xC0FFEE");
    assert_eq!(tokens, vec![Token::BytesLiteral(vec![0xc0, 0xff, 0xee])]);
}

#[test]
fn test_identifiers() {
    let tokens = collect_tokens("index in IsMatch SPAN_KIND_SERVER");
    assert_eq!(
        tokens,
        vec![
            Token::LowerIdent("index"),
            Token::In,
            Token::UpperIdent("IsMatch"),
            Token::UpperIdent("SPAN_KIND_SERVER"),
        ]
    );
}

#[test]
fn test_invalid_tokens() {
    let err = tokenize("name == @").err().unwrap();
    assert_eq!(err.position, 8);
    assert_eq!(err.invalid_slice, "@");

    // Odd number of hex digits.
    assert!(tokenize("0xABC").is_err());

    // Overflows i64.
    assert!(tokenize("99999999999999999999").is_err());
}

// ============================================================================
// Parser tests
// ============================================================================

#[test]
fn test_syntax_errors() {
    for condition in ["name ==", "name == \"x\" and", "(name == \"x\"", "== 1", "name == 1 1", ""] {
        assert!(
            matches!(parse_err(condition), ParseError::Syntax { .. }),
            "{:?} should be a syntax error",
            condition
        );
    }
}

#[test]
fn test_lexer_error_is_reported() {
    let err = parse_err("name == 'x'");
    assert_eq!(err.to_string(), "invalid token ''' at offset 8");
}

#[test]
fn test_unknown_path() {
    let err = parse_err("bogus == 1");
    assert!(matches!(err, ParseError::UnknownPath { ref path } if path == "bogus"));

    let err = parse_err(r#"name["x"] == 1"#);
    assert_eq!(err.to_string(), r#"invalid path 'name["x"]': field cannot be indexed"#);
}

#[test]
fn test_unknown_enum() {
    let err = parse_err("count == LEVEL_MEDIUM");
    assert_eq!(err.to_string(), "unknown enum 'LEVEL_MEDIUM'");
}

#[test]
fn test_invalid_terms() {
    assert!(matches!(parse_err(r#""abc""#), ParseError::InvalidTerm));
    assert!(matches!(parse_err("42 and enabled"), ParseError::InvalidTerm));
    assert!(matches!(parse_err("LEVEL_LOW"), ParseError::InvalidTerm));
}

#[test]
fn test_function_errors() {
    assert!(matches!(
        parse_err("Frobnicate(name)"),
        ParseError::UnknownFunction { .. }
    ));
    assert!(matches!(parse_err("IsMatch(name)"), ParseError::Arity { .. }));
    assert!(matches!(
        parse_err(r#"IsMatch(name, "[")"#),
        ParseError::InvalidArgument { .. }
    ));
}

#[test]
fn test_constant_folding() {
    assert_eq!(parse("1 < 2").constant_value(), Some(true));
    assert_eq!(parse("nil == nil").constant_value(), Some(true));
    assert_eq!(parse("1 in [1, 2]").constant_value(), Some(true));
    assert_eq!(parse(r#"false and name == "x""#).constant_value(), Some(false));
    assert_eq!(parse(r#"true or name == "x""#).constant_value(), Some(true));
    assert_eq!(parse("not (1 == 1)").constant_value(), Some(false));
    assert_eq!(parse("TraceID(0x0102030405060708090a0b0c0d0e0f10) != nil").constant_value(), Some(true));
    assert_eq!(parse(r#"true and name == "x""#).constant_value(), None);
}

#[test]
fn test_folded_branches_are_still_validated() {
    assert!(matches!(parse_err("false and bogus == 1"), ParseError::UnknownPath { .. }));
    assert!(matches!(parse_err("true or count == BOGUS"), ParseError::UnknownEnum { .. }));
}

// ============================================================================
// Evaluation tests
// ============================================================================

#[test]
fn test_precedence() {
    let ctx = checkout();
    // and binds tighter than or
    assert!(eval(r#"name == "x" and count == 1 or count == 42"#, &ctx));
    assert!(!eval(r#"name == "x" and (count == 1 or count == 42)"#, &ctx));
    // not applies to the following term only
    assert!(!eval("not count == 42", &ctx));
    assert!(eval(r#"not count == 1 and name == "checkout""#, &ctx));
}

#[test]
fn test_repeated_not() {
    let ctx = checkout();
    assert!(eval("not not count == 42", &ctx));
    assert!(!eval("not not not count == 42", &ctx));
    assert!(eval(r#"not not (name == "checkout" and enabled)"#, &ctx));
    assert!(eval(r#"count == 42 and not not name == "checkout""#, &ctx));
}

#[test]
fn test_string_escapes_are_decoded() {
    let ctx = checkout();
    assert!(eval(r#"Len("a\tb") == 3"#, &ctx));
    assert!(eval(r#"Len("a\nb\r") == 4"#, &ctx));
    assert!(eval(r#"Len("say \"hi\"") == 8"#, &ctx));
    assert!(eval(r#"Len("back\\slash") == 10"#, &ctx));
    assert!(eval(r#"Len("\d+") == 3"#, &ctx));
    assert!(eval(r#"attributes["http.method"] != "GET\n""#, &ctx));
}

#[test]
fn test_numeric_comparisons() {
    let ctx = checkout();
    assert!(eval("count == 42", &ctx));
    assert!(eval("count == 42.0", &ctx));
    assert!(eval("count > 41.5", &ctx));
    assert!(eval("count >= 42 and count <= 42", &ctx));
    assert!(eval("count > -1", &ctx));
    assert!(eval("count > LEVEL_HIGH", &ctx));
}

#[test]
fn test_string_comparisons() {
    let ctx = checkout();
    assert!(eval(r#"name == "checkout""#, &ctx));
    assert!(eval(r#"name < "d""#, &ctx));
    assert!(!eval(r#"name == "Checkout""#, &ctx));
    assert!(eval(r#"attributes["http.method"] == "GET""#, &ctx));
}

#[test]
fn test_mismatched_types() {
    let ctx = checkout();
    assert!(!eval("name == 42", &ctx));
    assert!(eval("name != 42", &ctx));
    assert!(!eval("name > 1", &ctx));
    assert!(!eval("name < 1", &ctx));
    assert!(!eval("enabled > false", &ctx));
}

#[test]
fn test_nil_semantics() {
    let ctx = checkout();
    assert!(!eval(r#"attributes["missing"] == "x""#, &ctx));
    assert!(!eval(r#"attributes["missing"] != "x""#, &ctx));
    assert!(!eval(r#"attributes["missing"] < "x""#, &ctx));
    assert!(eval(r#"attributes["missing"] == nil"#, &ctx));
    assert!(!eval(r#"attributes["missing"] != nil"#, &ctx));
    assert!(eval(r#"attributes["env"] != nil"#, &ctx));
    assert!(!eval(r#"attributes["env"] == nil"#, &ctx));
    assert!(eval("tags[5] == nil", &ctx));
}

#[test]
fn test_membership() {
    let ctx = checkout();
    assert!(eval(r#"name in ["checkout", "cart"]"#, &ctx));
    assert!(!eval(r#"name not in ["checkout", "cart"]"#, &ctx));
    assert!(eval(r#"name not in ["cart"]"#, &ctx));
    assert!(eval("count in [1, 42.0]", &ctx));
    assert!(eval(r#""b" in tags"#, &ctx));
    assert!(eval(r#"attributes["env"] in [name, "prod"]"#, &ctx));
    assert!(!eval(r#"attributes["missing"] in ["x"]"#, &ctx));
    assert!(!eval(r#"attributes["missing"] not in ["x"]"#, &ctx));
    assert!(!eval(r#"name in "checkout""#, &ctx));
}

#[test]
fn test_boolean_terms() {
    let ctx = checkout();
    assert!(eval("enabled", &ctx));
    assert!(!eval("not enabled", &ctx));
    assert!(!eval("name", &ctx));

    let disabled = TestContext { enabled: None, ..checkout() };
    assert!(!eval("enabled", &disabled));
    assert!(eval("not enabled", &disabled));
}

#[test]
fn test_functions() {
    let ctx = checkout();
    assert!(eval(r#"IsMatch(name, "^check")"#, &ctx));
    assert!(!eval(r#"IsMatch(attributes["missing"], ".*")"#, &ctx));
    assert!(eval(r#"HasPrefix(name, "check") and HasSuffix(name, "out")"#, &ctx));
    assert!(eval(r#"Contains(tags, "a")"#, &ctx));
    assert!(eval("Len(tags) == 2", &ctx));
    assert!(eval(r#"Concat(tags, ",") == "a,b""#, &ctx));
    assert!(eval(r#"ConvertCase(attributes["http.method"], "lower") == "get""#, &ctx));
    assert!(eval(r#"Int("42") == count"#, &ctx));
    assert!(eval(r#"IsString(name) and IsInt(count) and IsBool(enabled) and IsList(tags)"#, &ctx));
    assert!(!eval("IsDouble(count) or IsMap(tags)", &ctx));
    assert!(eval(r#"Concat([name, count], "-") == "checkout-42""#, &ctx));
}

#[test]
fn test_indexed_path() {
    let ctx = checkout();
    assert!(eval(r#"tags[1] == "b""#, &ctx));
    assert!(!eval(r#"tags[1] == "a""#, &ctx));
}

#[test]
fn test_condition_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Condition<TestFamily>>();
    assert_send_sync::<ConditionSequence<TestFamily>>();
}

// ============================================================================
// Sequence tests
// ============================================================================

#[test]
fn test_sequence_errors_are_aggregated() {
    let errors = ConditionSequence::<TestFamily>::parse(["name ==", "count == 42", "bogus == 1"])
        .err()
        .unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].condition(), "name ==");
    assert_eq!(errors[1].condition(), "bogus == 1");
    assert!(matches!(errors[1].parse_error(), ParseError::UnknownPath { .. }));
    assert_eq!(
        errors[1].to_string(),
        "failed to parse condition \"bogus == 1\": unknown path 'bogus'"
    );
}

#[test]
fn test_sequence_is_or() {
    let ctx = checkout();
    let sequence = ConditionSequence::<TestFamily>::parse([r#"name == "x""#, "count == 42"]).unwrap();
    assert_eq!(sequence.len(), 2);
    assert!(sequence.evaluate(&ctx));

    let sequence = ConditionSequence::<TestFamily>::parse([r#"name == "x""#, "count == 1"]).unwrap();
    assert!(!sequence.evaluate(&ctx));

    let empty = ConditionSequence::<TestFamily>::parse(Vec::<String>::new()).unwrap();
    assert!(empty.is_empty());
    assert!(!empty.evaluate(&ctx));
}

const CONDITION_POOL: &[&str] = &[
    r#"name == "checkout""#,
    r#"name == "cart""#,
    "count > 100",
    "count < 50",
    "enabled",
    "not enabled",
    r#"attributes["env"] == "dev""#,
    r#"attributes["missing"] != "x""#,
    r#""c" in tags"#,
];

proptest! {
    #[test]
    fn property_sequence_order_does_not_matter(
        (original, shuffled) in proptest::sample::subsequence(CONDITION_POOL, 0..=CONDITION_POOL.len())
            .prop_flat_map(|subset| (Just(subset.clone()), Just(subset).prop_shuffle())),
        count in -200i64..200,
        enabled in proptest::option::of(any::<bool>()),
    ) {
        let ctx = TestContext { count, enabled, ..checkout() };
        let original = ConditionSequence::<TestFamily>::parse(original).unwrap();
        let shuffled = ConditionSequence::<TestFamily>::parse(shuffled).unwrap();
        prop_assert_eq!(original.evaluate(&ctx), shuffled.evaluate(&ctx));
    }

    #[test]
    fn property_integer_comparisons_match_native(a in -100_000i64..100_000, b in -100_000i64..100_000) {
        let ctx = TestContext { count: a, ..checkout() };
        prop_assert_eq!(eval(&format!("count < {}", b), &ctx), a < b);
        prop_assert_eq!(eval(&format!("count >= {}", b), &ctx), a >= b);
        prop_assert_eq!(eval(&format!("count == {}", b), &ctx), a == b);
    }
}
