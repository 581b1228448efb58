use irlens_core::segment::{
    function_spans, global_decls, matching_brace, matching_paren, split_top_level, string_literals,
};

#[test]
fn matching_brace_tracks_nested_depth() {
    let text = "{ a { b } c } d }";
    assert_eq!(matching_brace(text, 1), Some(12));
}

#[test]
fn matching_brace_returns_none_when_text_ends() {
    assert_eq!(matching_brace("{ a { b }", 1), None);
    assert_eq!(matching_brace("{", 1), None);
}

#[test]
fn function_spans_skip_qualifiers_and_attribute_groups() {
    let text = "define dso_local noundef i32 @main(i32 %argc, ptr %argv) local_unnamed_addr #0 {\n  ret i32 0\n}\n";
    let spans = function_spans(text);
    assert_eq!(spans.len(), 1);
    let span = &spans[0];
    assert_eq!(span.name, "main");
    assert_eq!(span.return_type, "i32");
    assert_eq!(span.params, "i32 %argc, ptr %argv");
    assert_eq!(span.body, "\n  ret i32 0\n");
    assert!(span.closed);
}

#[test]
fn function_spans_handle_single_line_definitions() {
    let spans = function_spans("define i32 @add(i32 %a, i32 %b) { ret i32 0 }");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].body, " ret i32 0 ");
}

#[test]
fn unclosed_body_runs_to_end_of_text() {
    let text = "define void @broken() {\n  ret void\n";
    let spans = function_spans(text);
    assert_eq!(spans.len(), 1);
    assert!(!spans[0].closed);
    assert_eq!(spans[0].body, "\n  ret void\n");
}

#[test]
fn function_spans_ignore_declarations_and_missing_brace() {
    let text = "declare i32 @printf(ptr, ...)\ndefine i32 @nobody(i32 %x)\n";
    assert!(function_spans(text).is_empty());
}

#[test]
fn global_decls_accept_qualifiers_in_any_known_order() {
    let text = "@a = internal global i32 5, align 4\n\
                @.str = private unnamed_addr constant [3 x i8] c\"hi\\00\", align 1\n\
                @b = dso_local global ptr null\n\
                  %x = add i32 1, 2\n";
    let decls = global_decls(text);
    let names: Vec<&str> = decls.iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["a", ".str", "b"]);
    assert_eq!(decls[0].keyword, "global");
    assert_eq!(decls[0].tail, "i32 5, align 4");
    assert_eq!(decls[1].keyword, "constant");
}

#[test]
fn string_literals_bind_global_names_on_declaration_lines() {
    let text = "@msg = private constant [3 x i8] c\"ok\\00\"\n  call void @f(ptr c\"inline\")\n  @e = constant [0 x i8] c\"\"\n";
    let literals = string_literals(text);
    assert_eq!(literals.len(), 2);
    assert_eq!(literals[0].name, Some("msg"));
    assert_eq!(literals[0].payload, "ok\\00");
    assert_eq!(literals[1].name, None);
    assert_eq!(literals[1].payload, "inline");
}

#[test]
fn string_literals_do_not_span_lines() {
    let text = "source_filename = \"example.c\"\ntarget triple = \"x86_64-pc-linux-gnu\"\n";
    assert!(string_literals(text).is_empty());
}

#[test]
fn matching_paren_skips_nested_attribute_parens() {
    let text = "(ptr byval(%struct.S) %s, i32 %n) {";
    assert_eq!(matching_paren(text, 1), Some(32));
}

#[test]
fn parameter_list_with_parenthesised_attributes_is_kept_whole() {
    let text = "define dso_local void @f(ptr noundef byval(%struct.S) align 8 %s, i32 noundef %n) #0 {\n  ret void\n}\n";
    let spans = function_spans(text);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].params, "ptr noundef byval(%struct.S) align 8 %s, i32 noundef %n");
    assert_eq!(spans[0].body, "\n  ret void\n");
}

#[test]
fn literal_struct_return_type_is_recognised() {
    let text = "define { i64, i64 } @pair(i64 %a) {\n  ret { i64, i64 } zeroinitializer\n}\n";
    let spans = function_spans(text);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "pair");
    assert_eq!(spans[0].return_type, "{ i64, i64 }");
    assert_eq!(spans[0].body, "\n  ret { i64, i64 } zeroinitializer\n");
}

#[test]
fn top_level_split_ignores_nested_commas() {
    assert_eq!(
        split_top_level("ptr byval({ i32, i32 }) %p, <2 x i32> %v, i64 %n"),
        vec!["ptr byval({ i32, i32 }) %p", "<2 x i32> %v", "i64 %n"]
    );
    assert!(split_top_level("   ").is_empty());
}
