use placement_portal::eligibility::is_eligible;

fn departments(list: &[&str]) -> Vec<String> {
    list.iter().map(|d| d.to_string()).collect()
}

#[test]
fn test_exact_department_match() {
    assert!(is_eligible(&departments(&["CSE", "ECE"]), "CSE"));
    assert!(is_eligible(&departments(&["CSE", "ECE"]), "ECE"));
    assert!(!is_eligible(&departments(&["CSE", "ECE"]), "MECH"));
}

#[test]
fn test_all_sentinel_matches_any_department() {
    assert!(is_eligible(&departments(&["All"]), "CSE"));
    assert!(is_eligible(&departments(&["All"]), "Anything"));
    // Sentinel alongside concrete departments still matches everyone
    assert!(is_eligible(&departments(&["CSE", "All"]), "ECE"));
}

#[test]
fn test_match_is_case_sensitive() {
    assert!(!is_eligible(&departments(&["CSE"]), "cse"));
    assert!(!is_eligible(&departments(&["cse"]), "CSE"));
    // The sentinel is literal too
    assert!(!is_eligible(&departments(&["ALL"]), "CSE"));
}

#[test]
fn test_no_normalization() {
    assert!(!is_eligible(&departments(&["CSE "]), "CSE"));
    assert!(!is_eligible(&departments(&["CSE"]), " CSE"));
}

#[test]
fn test_empty_list_matches_nothing() {
    assert!(!is_eligible(&[], "CSE"));
}
