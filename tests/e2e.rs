//! End-to-end scenario tests: compile a literal Spyre source to a real
//! output file via [`spyre::compile`] and assert the expected instruction
//! fragments appear, in order, in the emitted listing.

use std::io::Write;

/// Compiles `source`, returning the emitted listing as a vector of lines.
fn compile_to_lines(source: &str) -> Vec<String> {
    let mut input = tempfile::Builder::new().suffix(".spy").tempfile().unwrap();
    input.write_all(source.as_bytes()).unwrap();
    let output = tempfile::Builder::new().suffix(".asm").tempfile().unwrap();

    spyre::compile(input.path(), output.path())
        .unwrap_or_else(|e| panic!("compilation of:\n{source}\nfailed: {e}"));

    std::fs::read_to_string(output.path())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Finds the label number `N` in a `jmp __LABEL__N` or `__LABEL__N:` line.
fn label_number(line: &str) -> Option<&str> {
    line.strip_prefix("jmp __LABEL__")
        .or_else(|| line.strip_prefix("__LABEL__"))
        .map(|rest| rest.trim_end_matches(':'))
}

/// Asserts each of `patterns` appears in `lines`, in order, starting the
/// search for pattern `i+1` after the match for pattern `i`. The literal
/// placeholder `"<ret>"` inside a `jmp __LABEL__<ret>` / `__LABEL__<ret>:`
/// pattern is resolved to whatever label number the *first* occurrence of
/// such a pattern actually used, and every subsequent `<ret>` placeholder
/// must match that same number — mirroring the "both branches jump to the
/// same label" style of assertion without hard-coding a label index that
/// depends on unrelated allocation order elsewhere in the listing.
fn assert_in_order(lines: &[String], patterns: &[&str]) {
    let mut cursor = 0usize;
    let mut bound_ret: Option<String> = None;
    for pattern in patterns {
        let needle = if let Some(ret) = &bound_ret {
            pattern.replace("<ret>", ret)
        } else {
            pattern.to_string()
        };
        let found = lines[cursor..].iter().position(|line| {
            if needle.contains("<ret>") {
                // Not yet bound: accept any label number and bind it.
                let prefix = needle.split("<ret>").next().unwrap();
                line.starts_with(prefix)
            } else {
                line == &needle
            }
        });
        let idx = found.unwrap_or_else(|| {
            panic!(
                "expected to find {pattern:?} (resolved: {needle:?}) after index {cursor} in:\n{}",
                lines.join("\n")
            )
        });
        if bound_ret.is_none() && pattern.contains("<ret>") {
            bound_ret = label_number(&lines[cursor + idx]).map(str::to_string);
        }
        cursor += idx + 1;
    }
}

#[test]
fn scenario_assign_int() {
    let lines = compile_to_lines("main:()->int{x:int;x=1+2;return x;}");
    assert_in_order(
        &lines,
        &[
            "res 1",
            "lea 0",
            "ipush 1",
            "ipush 2",
            "iadd",
            "isave",
            "ilload 0",
            "jmp __LABEL__<ret>",
            "__LABEL__<ret>:",
            "iret",
        ],
    );
}

#[test]
fn scenario_if_elif_else_chain_shares_one_chain_label() {
    let source = "main:()->int{a:int;a=0;if a>0{a=1;}elif a<0{a=2;}else{a=3;}return a;}";
    let lines = compile_to_lines(source);

    let jmp_chain_targets: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.strip_prefix("jmp __LABEL__"))
        .collect();
    // The if-true body and the elif-true body both jump past the chain to
    // the same label; that label is the final one before the else body.
    let label_defs: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.strip_prefix("__LABEL__").and_then(|s| s.strip_suffix(':')))
        .collect();
    // Every defined label is unique.
    let mut sorted = label_defs.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), label_defs.len(), "duplicate label definition in {lines:?}");

    // There must be at least two distinct "jmp __LABEL__n" targets among
    // the branch-false jumps (jz) that land on a chain label shared by both
    // the if and elif true-branches.
    assert!(
        jmp_chain_targets.len() >= 2,
        "expected at least two jmp instructions (chain-skip x2) in {lines:?}"
    );

    // The chain label appears exactly once as a definition.
    let mut chain_label_candidates = std::collections::HashMap::new();
    for l in &label_defs {
        *chain_label_candidates.entry(*l).or_insert(0) += 1;
    }
    assert!(
        chain_label_candidates.values().all(|&count| count == 1),
        "every label must be defined exactly once: {lines:?}"
    );
}

#[test]
fn scenario_while_break_continue() {
    let source = "main:()->int{i:int;i=0;while i<10{if i==5{break;}i=i+1;continue;}return i;}";
    let lines = compile_to_lines(source);

    let top_def = lines
        .iter()
        .position(|l| l.ends_with(':') && l.starts_with("__LABEL__"))
        .expect("at least one label definition");
    assert!(top_def > 0, "a label definition must follow the condition setup");

    // `continue` jumps to the loop top, `break` jumps to the loop bottom;
    // both must be distinct jmp targets.
    let jmp_targets: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.strip_prefix("jmp __LABEL__"))
        .collect();
    assert!(
        jmp_targets.len() >= 2,
        "expected jmp instructions for both break and continue in {lines:?}"
    );
    let unique: std::collections::HashSet<&&str> = jmp_targets.iter().collect();
    assert!(
        unique.len() >= 2,
        "break and continue must target different labels: {lines:?}"
    );
}

#[test]
fn scenario_struct_field_chain() {
    let source = "P:struct{x:int;y:int;}main:()->int{p:P;p.y=7;return 0;}";
    let lines = compile_to_lines(source);
    // `p` is a by-value struct local, so its L-value path loads the handle
    // (`ilload`, not `lea`) before the field offset; the address must still
    // land on the operand stack before the value, ahead of `isave`.
    assert_in_order(&lines, &["ilload 0", "icinc 8", "ipush 7", "isave"]);
}

#[test]
fn scenario_foreign_variadic_call() {
    let source = r#"printf:cfunc(fmt:byte^,...)->int;main:()->int{printf("%d",1);return 0;}"#;
    let lines = compile_to_lines(source);
    assert!(lines.iter().any(|l| l == r#"let __CFUNC__printf "printf""#));
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("let __STR__")).count(),
        1,
        "expected exactly one string literal table entry in {lines:?}"
    );
    assert!(
        lines.iter().any(|l| l == "ccall __CFUNC__printf, 2"),
        "expected a 2-argument ccall to printf in {lines:?}"
    );
}

#[test]
fn scenario_pointer_arithmetic_scales_by_slot_size() {
    let source = "main:()->int{q:int^;q=q+3;return 0;}";
    let lines = compile_to_lines(source);
    let ipush3 = lines.iter().position(|l| l == "ipush 3").expect("ipush 3");
    assert_eq!(lines[ipush3 + 1], "ipush 8");
    assert_eq!(lines[ipush3 + 2], "imul");
    assert_eq!(lines[ipush3 + 3], "iadd");
}

#[test]
fn every_compiled_listing_ends_with_the_entry_point_and_a_call_to_main() {
    let lines = compile_to_lines("main:()->int{return 0;}");
    assert_eq!(lines[0], "jmp __ENTRY_POINT__");
    assert_eq!(lines[lines.len() - 2], "__ENTRY_POINT__:");
    assert_eq!(lines.last().unwrap(), "call __FUNC__main, 0");
}
