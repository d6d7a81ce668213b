use super::Parser;
use crate::ast::{AstNode, IfKind};
use crate::lexer::Lexer;

fn parse(src: &str) -> crate::ast::Program {
    let tokens = Lexer::new(src).tokenize().unwrap();
    Parser::new(tokens).unwrap().parse().unwrap()
}

#[test]
fn parses_empty_function() {
    let program = parse("main : () -> int { }");
    assert!(program.functions.contains_key("main"));
    let node_id = program.functions["main"];
    match program.ast.node(node_id) {
        AstNode::Function { info, .. } => {
            assert_eq!(info.reserve_slots, 0);
            assert!(!info.is_foreign);
            assert_eq!(info.nargs, 0);
        }
        _ => panic!("expected a Function node"),
    }
}

#[test]
fn local_declarations_reserve_slots_in_order() {
    let program = parse("main : () -> int { x : int; y : float; return 0; }");
    let node_id = program.functions["main"];
    match program.ast.node(node_id) {
        AstNode::Function { info, .. } => assert_eq!(info.reserve_slots, 2),
        _ => panic!(),
    }
}

#[test]
fn cfunc_is_registered_as_foreign_and_variadic() {
    let program = parse("printf : cfunc(fmt: byte^, ...) -> int;");
    let node_id = program.functions["printf"];
    match program.ast.node(node_id) {
        AstNode::Function { info, .. } => {
            assert!(info.is_foreign);
            assert!(info.is_variadic);
            assert_eq!(info.nargs, 1);
        }
        _ => panic!(),
    }
}

#[test]
fn struct_forward_declaration_completes_in_place() {
    let program = parse(
        "P : struct;
         P : struct { x: int; y: int; }",
    );
    let def = program.structs.get("P").unwrap();
    assert!(def.complete);
    assert_eq!(def.size, 2);
    assert_eq!(def.fields.len(), 2);
}

#[test]
fn redefining_a_complete_struct_is_an_error() {
    let tokens = Lexer::new(
        "P : struct { x: int; }
         P : struct { y: int; }",
    )
    .tokenize()
    .unwrap();
    let result = Parser::new(tokens).unwrap().parse();
    assert!(result.is_err());
}

#[test]
fn struct_cannot_contain_itself_by_value() {
    let tokens = Lexer::new("P : struct { self_field: P; }")
        .tokenize()
        .unwrap();
    let result = Parser::new(tokens).unwrap().parse();
    assert!(result.is_err());
}

#[test]
fn struct_may_contain_pointer_to_self() {
    let program = parse("P : struct { next: P^; }");
    let def = program.structs.get("P").unwrap();
    assert_eq!(def.fields.len(), 1);
}

#[test]
fn by_value_struct_local_reserves_one_extra_slot_for_its_handle() {
    let program = parse(
        "P : struct { x: int; y: int; }
         main : () -> int { p: P; return 0; }",
    );
    let node_id = program.functions["main"];
    match program.ast.node(node_id) {
        // 1 handle slot + 2 struct-body slots
        AstNode::Function { info, .. } => assert_eq!(info.reserve_slots, 3),
        _ => panic!(),
    }
}

#[test]
fn if_elif_else_chain_are_consecutive_siblings() {
    let program = parse(
        "main : () -> int {
            if a > 0 { }
            elif a < 0 { }
            else { }
            return 0;
        }",
    );
    let node_id = program.functions["main"];
    let body_block = match program.ast.node(node_id) {
        AstNode::Function { info, .. } => info.block.unwrap(),
        _ => panic!(),
    };
    let children = &program.ast.block(body_block).children;
    assert_eq!(children.len(), 4); // if, elif, else, return
    let kinds: Vec<_> = children[..3]
        .iter()
        .map(|id| match program.ast.node(*id) {
            AstNode::If { kind, .. } => *kind,
            _ => panic!("expected If nodes"),
        })
        .collect();
    assert_eq!(kinds, vec![IfKind::Reg, IfKind::Elif, IfKind::Else]);
}

#[test]
fn for_loop_init_and_post_are_not_children_of_any_block() {
    let program = parse(
        "main : () -> int {
            i : int;
            for i = 0; i < 10; i = i + 1 { }
            return 0;
        }",
    );
    let node_id = program.functions["main"];
    let body_block = match program.ast.node(node_id) {
        AstNode::Function { info, .. } => info.block.unwrap(),
        _ => panic!(),
    };
    let children = &program.ast.block(body_block).children;
    // the local decl doesn't appear (no AstNode); for-loop and return do
    assert_eq!(children.len(), 2);
    match program.ast.node(children[0]) {
        AstNode::For { init, post, .. } => {
            assert!(matches!(program.ast.node(*init), AstNode::Assign { .. }));
            assert!(matches!(program.ast.node(*post), AstNode::Assign { .. }));
        }
        _ => panic!("expected a For node"),
    }
}

#[test]
fn missing_semicolon_before_keyword_is_reported() {
    let tokens = Lexer::new("main : () -> int { x : int; x = 1 if true { } }")
        .tokenize()
        .unwrap();
    let result = Parser::new(tokens).unwrap().parse();
    assert!(result.is_err());
    assert!(result.unwrap_err().message.contains("semicolon"));
}

#[test]
fn unterminated_block_comment_is_rejected_before_parsing_begins() {
    let tokens = Lexer::new("main : () -> int { /* oops").tokenize().unwrap();
    assert!(Parser::new(tokens).is_err());
}
