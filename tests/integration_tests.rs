//! Integration tests for condition validation
//!
//! These tests exercise the public entry points the way the workflow builder
//! and the persistence layer call them.

use condition_gate::condition::{CompareOp, ConditionValidator, Expression, Literal};
use condition_gate::{
    pre_validate_condition_expression, pre_validate_text, sanitize_for_display,
    validate_condition_expression, ValidationResult,
};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn reason_of(expression: &str) -> String {
    validate_condition_expression(expression)
        .reason()
        .unwrap_or_else(|| panic!("{} unexpectedly valid", expression))
        .to_string()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_valid_string_comparison() {
    assert_eq!(
        validate_condition_expression("__v0 === 'test'"),
        ValidationResult::Valid
    );
}

#[test]
fn test_empty_expression() {
    assert_eq!(
        validate_condition_expression(""),
        ValidationResult::Invalid("Condition expression cannot be empty".to_string())
    );
}

#[test]
fn test_eval_is_disallowed_syntax() {
    assert!(reason_of("eval('x')").contains("disallowed syntax"));
}

#[test]
fn test_arrow_function_rejected_before_method_check() {
    let reason = reason_of("__v0.map(x => x)");
    assert!(reason.contains("disallowed syntax"));
    assert!(!reason.contains("Method"));
}

#[test]
fn test_method_not_in_whitelist() {
    assert!(reason_of("__v0.map()").contains("Method \"map\" is not allowed"));
}

#[test]
fn test_unknown_identifier() {
    assert!(reason_of("myVar === 10").contains("Unknown identifier \"myVar\""));
}

#[test]
fn test_sanitize_script_tag() {
    assert_eq!(sanitize_for_display("<script>"), "&lt;script&gt;");
}

// ============================================================================
// Attack Surface
// ============================================================================

#[test]
fn test_code_execution_attempts_are_rejected() {
    for attack in [
        "__v0.constructor.constructor('return process')()",
        "__v0['constructor']",
        r"__v0['c\onstructor'] !== null",
        r"__v0['\x5f_proto__'] !== null",
        r"__v0['\u0063onstructor'].name === 'Object'",
        "new Function('return 1')()",
        "import('child_process')",
        "require('fs').readFileSync('/etc/passwd')",
        "__v0 === 1; process.exit(1)",
        "globalThis.eval",
        "this.x",
        "Reflect.ownKeys(__v0)",
        "__v0.__proto__.polluted === 1",
        "`${__v0}`",
        "(() => 1)()",
        "__v0.toString.call(__v1)",
        "__v0.valueOf()",
        "delete __v0.x",
        "__v0 = 1",
        "__v0 += 1",
        "__v0++",
        "--__v0",
        "__v0 << 2",
        "({}).x",
        "[__v0].includes(1)",
        "__v0 === 1, __v1",
        "while(true) __v0",
        "switch(__v0) {}",
        "try { __v0 } catch (e) {}",
        "throw __v0",
        "return __v0",
        "window.alert(1)",
        "document.cookie",
        "__v0 ? 1 : 2",
        "__v0 + __v1 > 2",
        "__v0 instanceof Object",
        "typeof __v0 === 'string'",
        "__v0 in __v1",
    ] {
        assert!(
            !validate_condition_expression(attack).is_valid(),
            "{} should be rejected",
            attack
        );
    }
}

#[test]
fn test_denylist_ignores_case() {
    for input in ["EVAL('x')", "Process.env", "__v0.CONSTRUCTOR", "New Date()"] {
        assert!(reason_of(input).contains("disallowed syntax"), "{}", input);
    }
}

#[test]
fn test_bracket_notation_rules() {
    assert!(validate_condition_expression("__v0[0] === 'a'").is_valid());
    assert!(validate_condition_expression("__v1['total'] > 100").is_valid());
    assert!(reason_of("obj['x'] === 1")
        .contains("Bracket notation is only allowed on workflow variables"));
    assert!(reason_of("__v0[__v1] === 1").contains("Invalid bracket notation"));
}

#[test]
fn test_deep_nesting_on_worker_sized_stack() {
    let nested = format!("{}__v0{}", "(".repeat(2040), ")".repeat(2040));
    let result = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || validate_condition_expression(&nested))
        .expect("spawn validation thread")
        .join()
        .expect("validation thread should not die");
    assert!(result.reason().unwrap().contains("nested too deeply"));
}

// ============================================================================
// Realistic Branch Conditions
// ============================================================================

#[test]
fn test_realistic_conditions_are_valid() {
    for condition in [
        "__v0.toLowerCase().includes('yes')",
        "__v0 === 'confirmed' && __v1 >= 2",
        "__v0.trim() !== '' || __v1 === null",
        "!(__v0.startsWith('+1') || __v0.startsWith('+44'))",
        "__v2.length > 0 && __v2[0] === 'vip'",
        "__v3 === true",
        "__v4.toFixed(2) === '10.00'",
    ] {
        let result = validate_condition_expression(condition);
        assert!(result.is_valid(), "{}: {}", condition, result);
    }
}

#[test]
fn test_validator_returns_ast() {
    let expr = ConditionValidator::new()
        .parse("__v0 === 'paid'")
        .expect("condition should parse");
    assert_eq!(
        expr,
        Expression::Compare {
            left: Box::new(Expression::Variable("__v0".to_string())),
            op: CompareOp::StrictEq,
            right: Box::new(Expression::Literal(Literal::String("paid".to_string()))),
        }
    );
}

// ============================================================================
// Pre-check and Display
// ============================================================================

#[test]
fn test_precheck_flow() {
    // Raw text with author tokens passes the pre-check
    let raw = "{{order.status}} === 'paid'";
    assert!(pre_validate_text(raw).is_valid());

    // After substitution the authoritative check decides
    assert!(validate_condition_expression("__v0 === 'paid'").is_valid());
}

#[test]
fn test_precheck_rejects_wrong_types() {
    for value in [json!(null), json!(1.5), json!(false), json!(["__v0"])] {
        assert_eq!(
            pre_validate_condition_expression(&value).reason(),
            Some("Condition must be a non-empty string")
        );
    }
}

#[test]
fn test_precheck_flags_keywords() {
    let result = pre_validate_text("{{a}}.constructor");
    assert!(result.reason().unwrap().contains("disallowed keyword"));
}

#[test]
fn test_rejection_reason_is_safe_to_display() {
    let reason = reason_of("<img src=x onerror=alert(1)>");
    let shown = sanitize_for_display(&reason);
    assert!(!shown.contains('<'));
    assert!(!shown.contains('>'));
}

#[test]
fn test_result_json_shape() {
    let result = validate_condition_expression("myVar");
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"status": "invalid", "reason": "Unknown identifier \"myVar\""})
    );
}
