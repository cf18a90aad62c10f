use mot_insight::{classify::prompt, taxonomy::MOT_CATEGORIES};

#[test]
fn prompt_is_deterministic() {
    let first = prompt::build_prompt("The waiter was rude.");
    let second = prompt::build_prompt("The waiter was rude.");
    assert_eq!(first, second);
}

#[test]
fn prompt_lists_every_category_and_the_review() {
    let rendered = prompt::build_prompt("Great pizza, slow service.");
    for mot in MOT_CATEGORIES.iter() {
        assert!(rendered.contains(mot), "missing category {mot}");
    }
    assert!(rendered.contains("Great pizza, slow service."));
    assert!(rendered.contains("strict JSON"));
}
