//! Integration tests for variable substitution, concatenation and request
//! splitting.

use std::ptr;

use xrsl::interpreter::{EvalError, RslError, RslParser, evaluate, split_rsl};
use xrsl::parser::{Rsl, parse_rsl};

fn evaluated(source: &str) -> String {
    RslParser::new(source).evaluate().unwrap().to_string()
}

fn eval_error(source: &str) -> EvalError {
    match RslParser::new(source).evaluate().unwrap_err() {
        RslError::Eval(error) => error,
        RslError::Parse(error) => panic!("unexpected parse error: {error}"),
    }
}

// =============================================================================
// Substitution
// =============================================================================

#[test]
fn substitution_binds_for_later_siblings() {
    assert_eq!(
        evaluated("&(rsl_substitution=(X /bin))(executable=$(X)/true)"),
        r#"&(rslsubstitution = ("X" "/bin"))(executable = "/bin/true")"#
    );
}

#[test]
fn unbound_variable_is_empty() {
    assert_eq!(evaluated("&(executable=$(NOPE))"), r#"&(executable = "")"#);
}

#[test]
fn use_before_binding_is_empty() {
    assert_eq!(
        evaluated("&(executable=$(A))(rslsubstitution=(A a))"),
        r#"&(executable = "")(rslsubstitution = ("A" "a"))"#
    );
}

#[test]
fn substitution_may_refer_to_earlier_bindings() {
    let text = evaluated(
        "&(rslsubstitution=(A /x)(B $(A)/y))(rslsubstitution=(C $(B)/z))(executable=$(C))",
    );
    assert!(text.ends_with(r#"(executable = "/x/y/z")"#), "{text}");
}

#[test]
fn inner_binding_shadows_outer() {
    let text = evaluated("&(rslsubstitution=(A outer))(&(rslsubstitution=(A inner))(x=$(A)))(y=$(A))");
    assert!(text.contains(r#"(x = "inner")"#), "{text}");
    assert!(text.contains(r#"(y = "outer")"#), "{text}");
}

// =============================================================================
// Scoping
// =============================================================================

#[test]
fn nested_groups_see_enclosing_bindings() {
    let text = evaluated("&(rslsubstitution=(A a))(|(x=$(A))(y=$(A)))");
    assert!(text.contains(r#"(x = "a")"#), "{text}");
    assert!(text.contains(r#"(y = "a")"#), "{text}");
}

#[test]
fn nested_and_bindings_do_not_leak() {
    let text = evaluated("&(&(rslsubstitution=(A a)))(x=$(A))");
    assert!(text.ends_with(r#"(x = "")"#), "{text}");
}

#[test]
fn or_branches_do_not_share_bindings() {
    let text = evaluated("&(|(&(rslsubstitution=(A a))(x=$(A)))(y=$(A)))");
    assert!(text.contains(r#"(x = "a")"#), "{text}");
    assert!(text.contains(r#"(y = "")"#), "{text}");
}

#[test]
fn multi_children_start_from_empty_scopes() {
    let text = evaluated("+(&(rslsubstitution=(A a))(x=$(A)))(&(y=$(A)))");
    assert_eq!(
        text,
        r#"+(&(rslsubstitution = ("A" "a"))(x = "a"))(&(y = ""))"#
    );
}

// =============================================================================
// Concatenation
// =============================================================================

#[test]
fn concatenation_joins_literals() {
    assert_eq!(
        evaluated(r#"&(executable="/usr" # "/bin/" # env)"#),
        r#"&(executable = "/usr/bin/env")"#
    );
}

#[test]
fn implicit_concatenation_with_variables() {
    assert_eq!(
        evaluated("&(rslsubstitution=(H host))(x=gsiftp://$(H)/file)"),
        r#"&(rslsubstitution = ("H" "host"))(x = "gsiftp://host/file")"#
    );
}

#[test]
fn sequences_are_evaluated_element_wise() {
    assert_eq!(
        evaluated(r#"&(rslsubstitution=(D /data))(inputfiles=(in $(D)/in))"#),
        r#"&(rslsubstitution = ("D" "/data"))(inputfiles = ("in" "/data/in"))"#
    );
}

#[test]
fn concatenating_a_sequence_on_the_left_fails() {
    let error = eval_error("&(x=(a b)#c)");
    assert!(matches!(error, EvalError::ConcatLeft { .. }));
    assert_eq!(
        error.to_string(),
        r#"left operand for concatenation does not evaluate to a literal: ("a" "b")"#
    );
}

#[test]
fn concatenating_a_sequence_on_the_right_fails() {
    let error = eval_error("&(x=c#(a b))");
    assert!(matches!(error, EvalError::ConcatRight { .. }));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn multi_below_the_root_is_rejected() {
    let error = eval_error("&(+(&(a=b)))");
    assert_eq!(
        error.to_string(),
        "multi-request operator only allowed at top level"
    );
    assert!(error.location().is_some());
}

#[test]
fn substitution_value_must_be_a_sequence() {
    assert!(matches!(
        eval_error(r#"&(rslsubstitution="A")"#),
        EvalError::SubstitutionNotSequence { .. }
    ));
}

#[test]
fn substitution_sequence_must_have_two_elements() {
    let error = eval_error("&(rslsubstitution=(A b c))");
    assert_eq!(
        error.to_string(),
        r#"rsl_substitution sequence is not of length 2: ("A" "b" "c")"#
    );
}

#[test]
fn substitution_parts_must_be_literals() {
    assert!(matches!(
        eval_error("&(rslsubstitution=((A) b))"),
        EvalError::SubstitutionName { .. }
    ));
    assert!(matches!(
        eval_error("&(rslsubstitution=(A (b)))"),
        EvalError::SubstitutionValue { .. }
    ));
}

#[test]
fn parse_errors_pass_through_evaluate() {
    let error = RslParser::new("&(a=").evaluate().unwrap_err();
    assert!(matches!(error, RslError::Parse(_)));
}

// =============================================================================
// Caching
// =============================================================================

#[test]
fn parser_results_are_computed_once() {
    let parser = RslParser::new("&(executable=$(X))");
    let first = parser.evaluate().unwrap();
    let second = parser.evaluate().unwrap();
    assert!(ptr::eq(first, second));
    assert!(ptr::eq(parser.parse().unwrap(), parser.parse().unwrap()));
}

#[test]
fn raw_tree_keeps_variables() {
    let parser = RslParser::new("&(executable=$(X))");
    assert_eq!(parser.parse().unwrap().to_string(), "&(executable = $(X))");
    assert_eq!(parser.source(), "&(executable=$(X))");
}

#[test]
fn cached_errors_are_returned_again() {
    let parser = RslParser::new("&(x=(a)#b)");
    assert_eq!(parser.evaluate().unwrap_err(), parser.evaluate().unwrap_err());
}

#[test]
fn evaluate_function_matches_parser() {
    let raw = parse_rsl("&(rslsubstitution=(A a))(x=$(A))").unwrap();
    let tree = evaluate(&raw).unwrap();
    assert_eq!(tree.to_string(), r#"&(rslsubstitution = ("A" "a"))(x = "a")"#);
}

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn split_multi_into_units() {
    let raw = parse_rsl("+(&(a=1))(+(&(b=2))(&(c=3)))").unwrap();
    let units: Vec<String> = split_rsl(&raw).iter().map(ToString::to_string).collect();
    assert_eq!(units, vec![r#"&(a = "1")"#, r#"&(b = "2")"#, r#"&(c = "3")"#]);
}

#[test]
fn non_multi_is_one_unit() {
    let raw = parse_rsl("&(a=1)").unwrap();
    let units = split_rsl(&raw);
    assert_eq!(units.len(), 1);
    assert!(matches!(units[0], Rsl::Boolean(_)));
}
