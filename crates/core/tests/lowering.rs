use irlens_core::config::LoweringConfig;
use irlens_core::lowering::{
    lower_function_body, lower_instruction, simplify_args, simplify_value, strip_temporary,
    Lowered,
};
use irlens_core::model::build_listing;

fn stmt(text: &str) -> Lowered {
    Lowered::Statement(text.to_string())
}

fn comment(text: &str) -> Lowered {
    Lowered::Comment(text.to_string())
}

#[test]
fn temporary_assignment_is_stripped() {
    assert_eq!(strip_temporary("  %5 = load i32, ptr %x"), "load i32, ptr %x");
    assert_eq!(strip_temporary("%call = call i32 @f()"), "call i32 @f()");
    assert_eq!(strip_temporary("ret void"), "ret void");
}

#[test]
fn user_call_becomes_call_statement() {
    assert_eq!(
        lower_instruction("%1 = call i32 @add(i32 noundef 2, i32 noundef %x)"),
        stmt("add(2, x);")
    );
    assert_eq!(lower_instruction("tail call void @reset()"), stmt("reset();"));
}

#[test]
fn varargs_call_uses_arguments_after_callee() {
    assert_eq!(
        lower_instruction("%2 = call i32 (ptr, ...) @printf(ptr noundef @.str.1, i32 noundef %1)"),
        stmt("printf(.str.1, 1);")
    );
}

#[test]
fn intrinsic_call_is_elided() {
    let line = "call void @llvm.memcpy.p0.p0.i64(ptr %d, ptr %s, i64 16, i1 false)";
    assert_eq!(lower_instruction(line), Lowered::Elided);
    assert_eq!(lower_instruction(line).into_line(), None);
}

#[test]
fn call_with_unclosed_arguments_renders_empty_call() {
    assert_eq!(lower_instruction("call void @broken(i32 1"), stmt("broken();"));
}

#[test]
fn call_arguments_are_capped_at_five() {
    assert_eq!(
        lower_instruction("call void @many(i32 1, i32 2, i32 3, i32 4, i32 5, i32 6, i32 7)"),
        stmt("many(1, 2, 3, 4, 5, ...);")
    );
}

#[test]
fn indirect_call_is_not_a_call_statement() {
    assert_eq!(lower_instruction("call void %fp(ptr @g)"), Lowered::Elided);
}

#[test]
fn returns_render_bare_or_with_value() {
    assert_eq!(lower_instruction("ret void"), stmt("return;"));
    assert_eq!(lower_instruction("ret i32 undef"), stmt("return;"));
    assert_eq!(lower_instruction("ret"), stmt("return;"));
    assert_eq!(lower_instruction("ret i32 0"), stmt("return 0;"));
    assert_eq!(lower_instruction("ret i32 %3"), stmt("return 3;"));
    assert_eq!(lower_instruction("ret ptr @table"), stmt("return table;"));
}

#[test]
fn arithmetic_becomes_comment_only() {
    assert_eq!(lower_instruction("%3 = add nsw i32 %2, %b"), comment("2 + b"));
    assert_eq!(lower_instruction("%4 = sub i32 10, %x"), comment("10 - x"));
    assert_eq!(lower_instruction("%5 = mul i64 %a, 3"), comment("a * 3"));
    assert_eq!(lower_instruction("%6 = udiv exact i32 %a, 4"), comment("a / 4"));
    assert_eq!(lower_instruction("%7 = sdiv i32 %a, -2"), comment("a / -2"));
    assert_eq!(
        lower_instruction("%3 = add nsw i32 %2, %b").into_line().as_deref(),
        Some("// 2 + b")
    );
}

#[test]
fn listed_comparisons_become_comments() {
    assert_eq!(lower_instruction("%c = icmp eq i32 %x, 0"), comment("x == 0"));
    assert_eq!(lower_instruction("%c = icmp ne i32 %x, %y"), comment("x != y"));
    assert_eq!(lower_instruction("%c = icmp ult i32 %i, 10"), comment("i < 10"));
    assert_eq!(lower_instruction("%c = icmp ugt i32 %i, 10"), comment("i > 10"));
}

#[test]
fn unlisted_comparison_predicate_is_elided() {
    assert_eq!(lower_instruction("%c = icmp slt i32 %i, 10"), Lowered::Elided);
}

#[test]
fn placeholders_for_branch_memory_and_alloca() {
    assert_eq!(lower_instruction("br label %5"), comment("branch instruction"));
    assert_eq!(lower_instruction("br i1 %c, label %t, label %f"), comment("branch instruction"));
    assert_eq!(lower_instruction("%2 = load i32, ptr %1, align 4"), comment("memory operation"));
    assert_eq!(lower_instruction("store i32 %a, ptr %1, align 4"), comment("memory operation"));
    assert_eq!(lower_instruction("%1 = alloca i32, align 4"), comment("local variable"));
}

#[test]
fn unmatched_instructions_are_elided() {
    assert_eq!(lower_instruction("%p = getelementptr inbounds i8, ptr %s, i64 1"), Lowered::Elided);
    assert_eq!(lower_instruction("unreachable"), Lowered::Elided);
    assert_eq!(lower_instruction("entry:"), Lowered::Elided);
}

#[test]
fn opcode_words_inside_operands_do_not_trigger_rules() {
    // `add` appears inside the global name, but the opcode is `store`.
    assert_eq!(lower_instruction("store i32 1, ptr @address"), comment("memory operation"));
    assert_eq!(lower_instruction("%v = xor i32 %ret, %call"), Lowered::Elided);
}

#[test]
fn simplify_value_rules() {
    assert_eq!(simplify_value("42"), "42");
    assert_eq!(simplify_value("-7"), "-7");
    assert_eq!(simplify_value("%count"), "count");
    assert_eq!(simplify_value("%"), "var");
    assert_eq!(simplify_value("@g"), "g");
    assert_eq!(simplify_value("@"), "global");
    assert_eq!(simplify_value("zeroinitializer_with_a_long_tail"), "zeroinitializer_with");
}

#[test]
fn simplify_args_handles_empty_and_nested_lists() {
    assert_eq!(simplify_args(""), "");
    assert_eq!(simplify_args("ptr %p, { i32, i32 } %agg, <2 x i32> %v"), "p, agg, v");
}

#[test]
fn add_scenario_lowers_to_bare_value_return() {
    let listing = build_listing("define i32 @add(i32 %a, i32 %b) { ret i32 0 }");
    let lines = lower_function_body(&listing.functions[0], &LoweringConfig::report());
    assert_eq!(lines, vec!["return 0;".to_string()]);
}

#[test]
fn body_over_cap_is_truncated_with_summary() {
    let mut text = String::from("define void @busy() {\n");
    for i in 0..25 {
        text.push_str(&format!("  call void @step{i}()\n"));
    }
    text.push_str("  ret void\n}\n");
    let listing = build_listing(&text);
    let function = &listing.functions[0];

    let report = lower_function_body(function, &LoweringConfig::report());
    assert_eq!(report.len(), 21);
    assert_eq!(report[19], "step19();");
    assert_eq!(report[20], "// ... 6 more lines omitted ...");

    let standalone = lower_function_body(function, &LoweringConfig::standalone());
    assert_eq!(standalone.len(), 26);
    assert_eq!(standalone.last().map(String::as_str), Some("return;"));
}

#[test]
fn body_at_cap_is_not_truncated() {
    let mut text = String::from("define void @exact() {\n");
    for _ in 0..20 {
        text.push_str("  br label %1\n");
    }
    text.push_str("}\n");
    let listing = build_listing(&text);
    let lines = lower_function_body(&listing.functions[0], &LoweringConfig::report());
    assert_eq!(lines.len(), 20);
    assert!(lines.iter().all(|l| l == "// branch instruction"));
}

#[test]
fn elided_lines_do_not_count_toward_cap() {
    let mut text = String::from("define void @sparse() {\n");
    for _ in 0..40 {
        text.push_str("  %p = getelementptr i8, ptr %s, i64 1\n");
    }
    text.push_str("  ret void\n}\n");
    let listing = build_listing(&text);
    let lines = lower_function_body(&listing.functions[0], &LoweringConfig::report());
    assert_eq!(lines, vec!["return;".to_string()]);
}

#[test]
fn standalone_profile_emits_block_label_comments() {
    let text = "define i32 @f(i1 %c) {\n  br i1 %c, label %1, label %2\n1:\n  ret i32 1\n2:\n  ret i32 0\n}\n";
    let listing = build_listing(text);
    let function = &listing.functions[0];

    let standalone = lower_function_body(function, &LoweringConfig::standalone());
    assert_eq!(
        standalone,
        vec![
            "// branch instruction",
            "// Basic block 1:",
            "return 1;",
            "// Basic block 2:",
            "return 0;",
        ]
    );

    let report = lower_function_body(function, &LoweringConfig::report());
    assert_eq!(report, vec!["// branch instruction", "return 1;", "return 0;"]);
}

#[test]
fn aggregate_operands_are_truncated_whole() {
    assert_eq!(
        lower_instruction("ret { i32, i32 } { i32 1, i32 2 }"),
        stmt("return { i32, i32 } { i32 1;")
    );
    assert_eq!(
        lower_instruction("ret { i64, i64 } zeroinitializer"),
        stmt("return zeroinitializer;")
    );
    assert_eq!(
        lower_instruction("call void @use(ptr getelementptr (i8, ptr @s, i64 1), i32 %n)"),
        stmt("use(ptr getelementptr (i, n);")
    );
}
