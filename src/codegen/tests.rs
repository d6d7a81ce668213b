use super::Codegen;
use crate::lexer::Lexer;
use crate::parser::Parser;

fn generate(src: &str) -> Vec<String> {
    let tokens = Lexer::new(src).tokenize().unwrap();
    let program = Parser::new(tokens).unwrap().parse().unwrap();
    Codegen::new(program).generate().unwrap()
}

fn generate_err(src: &str) -> super::CodegenError {
    let tokens = Lexer::new(src).tokenize().unwrap();
    let program = Parser::new(tokens).unwrap().parse().unwrap();
    Codegen::new(program).generate().unwrap_err()
}

#[test]
fn listing_opens_with_entry_jump_and_closes_with_entry_point_and_main_call() {
    let lines = generate("main : () -> int { return 0; }");
    assert_eq!(lines[0], "jmp __ENTRY_POINT__");
    assert_eq!(lines[lines.len() - 2], "__ENTRY_POINT__:");
    assert_eq!(lines.last().unwrap(), "call __FUNC__main, 0");
}

#[test]
fn empty_function_body_emits_only_prologue_and_return() {
    let lines = generate("main : () -> int { }");
    assert!(lines.contains(&"__FUNC__main:".to_string()));
    assert!(lines.contains(&"res 0".to_string()));
    assert!(lines.contains(&"iret".to_string()));
}

#[test]
fn function_arguments_are_stored_into_their_slots() {
    let lines = generate("add : (a: int, b: int) -> int { return a + b; }");
    assert!(lines.contains(&"iarg 0".to_string()));
    assert!(lines.contains(&"ilsave 0".to_string()));
    assert!(lines.contains(&"iarg 1".to_string()));
    assert!(lines.contains(&"ilsave 1".to_string()));
}

#[test]
fn by_value_struct_local_gets_its_handle_initialized_in_the_prologue() {
    let lines = generate(
        "P : struct { x: int; y: int; }
         main : () -> int { p: P; return 0; }",
    );
    let res_idx = lines.iter().position(|l| l == "res 3").unwrap();
    assert_eq!(lines[res_idx + 1], "lea 1");
    assert_eq!(lines[res_idx + 2], "ilsave 0");
}

#[test]
fn cfunc_declaration_emits_a_string_table_entry_and_no_body() {
    let lines = generate(
        "printf : cfunc(fmt: byte^, ...) -> int;
         main : () -> int { return 0; }",
    );
    assert!(!lines.iter().any(|l| l.starts_with("__FUNC__printf")));
    assert!(lines.iter().any(|l| l == r#"let __CFUNC__printf "printf""#));
}

#[test]
fn string_literals_get_sequential_table_indices() {
    let lines = generate(
        r#"puts : cfunc(s: byte^) -> int;
           main : () -> int { puts("a"); puts("b"); return 0; }"#,
    );
    assert!(lines.iter().any(|l| l == r#"let __STR__0 "a""#));
    assert!(lines.iter().any(|l| l == r#"let __STR__1 "b""#));
}

#[test]
fn assignment_coerces_int_to_float_destination() {
    let lines = generate("main : () -> int { f: float; f = 1; return 0; }");
    let isave = lines.iter().position(|l| l == "fsave").unwrap();
    assert!(lines[..isave].iter().any(|l| l == "itof 0"));
}

#[test]
fn return_coerces_float_expression_to_declared_int_return_type() {
    let lines = generate("main : () -> int { f: float; f = 1.5; return f; }");
    assert!(lines.iter().any(|l| l == "ftoi 0"));
}

#[test]
fn while_loop_has_a_single_condition_label_and_a_single_exit_label() {
    let lines = generate("main : () -> int { i: int; i = 0; while i < 10 { i = i + 1; } return 0; }");
    let jz_count = lines.iter().filter(|l| l.starts_with("jz __LABEL__")).count();
    assert_eq!(jz_count, 1);
}

#[test]
fn break_and_continue_target_different_labels_than_each_other() {
    let lines = generate(
        "main : () -> int {
            i: int; i = 0;
            while i < 10 {
                if i == 5 { break; }
                continue;
            }
            return 0;
        }",
    );
    let jmp_targets: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.strip_prefix("jmp __LABEL__"))
        .collect();
    let unique: std::collections::HashSet<&&str> = jmp_targets.iter().collect();
    assert!(unique.len() >= 2, "break/continue/bottom must differ: {lines:?}");
}

#[test]
fn pointer_arithmetic_on_a_struct_pointer_scales_by_struct_size() {
    let lines = generate(
        "P : struct { x: int; y: int; }
         main : () -> int { p: P^; p = p + 1; return 0; }",
    );
    let idx = lines.iter().position(|l| l == "ipush 1").unwrap();
    assert_eq!(lines[idx + 1], "ipush 16");
    assert_eq!(lines[idx + 2], "imul");
}

#[test]
fn byte_pointer_arithmetic_is_not_scaled() {
    let lines = generate("main : () -> int { s: byte^; s = s + 1; return 0; }");
    let idx = lines.iter().position(|l| l == "ipush 1").unwrap();
    assert_eq!(lines[idx + 1], "iadd", "byte^ arithmetic must not be scaled");
}

#[test]
fn struct_field_access_emits_scaled_byte_offset() {
    let lines = generate(
        "P : struct { x: int; y: int; z: int; }
         main : () -> int { p: P; return p.z; }",
    );
    assert!(lines.iter().any(|l| l == "icinc 16"));
}

#[test]
fn dot_on_incomplete_struct_type_is_a_resolve_error() {
    let err = generate_err(
        "P : struct;
         main : () -> int { p: P^; return (p^).x; }",
    );
    assert_eq!(err.kind, super::CodegenErrorKind::Resolve);
}

#[test]
fn mismatched_assignment_types_are_a_type_error() {
    let err = generate_err(
        "P : struct { x: int; }
         Q : struct { x: int; }
         main : () -> int { p: P; q: Q; p = q; return 0; }",
    );
    assert_eq!(err.kind, super::CodegenErrorKind::Type);
}

#[test]
fn wrong_argument_count_is_a_type_error() {
    let err = generate_err(
        "add : (a: int, b: int) -> int { return a + b; }
         main : () -> int { return add(1); }",
    );
    assert_eq!(err.kind, super::CodegenErrorKind::Type);
}

#[test]
fn call_to_unknown_function_is_a_resolve_error() {
    let err = generate_err("main : () -> int { return ghost(1); }");
    assert_eq!(err.kind, super::CodegenErrorKind::Resolve);
}

#[test]
fn undeclared_identifier_is_a_resolve_error() {
    let err = generate_err("main : () -> int { return nope; }");
    assert_eq!(err.kind, super::CodegenErrorKind::Resolve);
}

#[test]
fn a_local_declared_inside_a_nested_block_resolves_within_that_block() {
    let lines = generate("main : () -> int { while 1 { y: int; y = 5; } return 0; }");
    assert!(lines.iter().any(|l| l == "ipush 5"));
    assert!(lines.iter().any(|l| l == "isave"));
}

#[test]
fn assignment_emits_the_lvalue_address_before_the_rvalue_expression() {
    let lines = generate("main : () -> int { x: int; x = 1 + 2; return x; }");
    let lea = lines.iter().position(|l| l == "lea 0").unwrap();
    let ipush1 = lines.iter().position(|l| l == "ipush 1").unwrap();
    let isave = lines.iter().position(|l| l == "isave").unwrap();
    assert!(lea < ipush1, "the destination address must be emitted before the value: {lines:?}");
    assert!(ipush1 < isave);
}

#[test]
fn modulo_and_bitwise_operators_are_rejected_by_the_code_generator() {
    for op in ["%", "|", "<<", ">>"] {
        let err = generate_err(&format!("main : () -> int {{ a: int; a = 1 {op} 2; return 0; }}"));
        assert_eq!(err.kind, super::CodegenErrorKind::Type, "operator '{op}' should be a type error");
    }
}
