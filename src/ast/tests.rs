use super::node::*;
use super::types::*;

#[test]
fn new_arena_has_empty_root_block() {
    let ast = Ast::new(Vec::new());
    let root_block = ast.node(ast.root).own_block().unwrap();
    assert!(ast.block(root_block).children.is_empty());
    assert_eq!(ast.block(root_block).parent_node, Some(ast.root));
}

#[test]
fn struct_value_slot_size_is_struct_size() {
    let mut structs = StructTable::default();
    structs.insert(StructDef {
        name: "P".into(),
        complete: true,
        size: 2,
        fields: vec![],
    });
    let ty = Datatype::new(Base::Struct("P".into()), 0);
    assert_eq!(slot_size(&ty, &structs), 2);
}

#[test]
fn pointer_and_primitive_slot_size_is_one() {
    let structs = StructTable::default();
    let ptr = Datatype::new(Base::Int, 1);
    let prim = Datatype::new(Base::Float, 0);
    assert_eq!(slot_size(&ptr, &structs), 1);
    assert_eq!(slot_size(&prim, &structs), 1);
}

#[test]
fn identical_types_ignores_modifiers() {
    let mut a = Datatype::new(Base::Int, 0);
    a.modifiers.insert(Modifiers::CONST);
    let b = Datatype::new(Base::Int, 0);
    assert!(a.identical_to(&b));
}

#[test]
fn identical_types_requires_same_struct_name() {
    let a = Datatype::new(Base::Struct("A".into()), 0);
    let b = Datatype::new(Base::Struct("B".into()), 0);
    assert!(!a.identical_to(&b));
}

#[test]
fn identical_types_requires_same_ptr_level() {
    let a = Datatype::new(Base::Int, 1);
    let b = Datatype::new(Base::Int, 0);
    assert!(!a.identical_to(&b));
}
