use sigsafe_core::{CreateWalletForm, FormError};

#[test]
fn default_form_has_one_empty_signatory_and_threshold_one() {
    let form = CreateWalletForm::default();
    assert_eq!(form.signatories, vec![String::new()]);
    assert_eq!(form.required_approvals, 1);
    assert_eq!(form.max_required_approvals(), 1);
    assert!(!form.can_remove_signatory());
}

#[test]
fn add_signatory_appends_exactly_one_empty_entry() {
    let mut form = CreateWalletForm::default();
    form.update_signatory(0, "0xabc").expect("update first");

    form.add_signatory();
    assert_eq!(form.signatories, vec!["0xabc".to_owned(), String::new()]);

    form.add_signatory();
    assert_eq!(form.signatories.len(), 3);
    assert_eq!(form.signatories[2], "");
    assert_eq!(form.max_required_approvals(), 3);
}

#[test]
fn remove_signatory_preserves_order_of_remaining_entries() {
    let mut form = CreateWalletForm {
        signatories: vec!["a".to_owned(), "b".to_owned(), "c".to_owned(), "d".to_owned()],
        required_approvals: 1,
    };

    let removed = form.remove_signatory(1).expect("remove b");
    assert_eq!(removed, "b");
    assert_eq!(form.signatories, vec!["a", "c", "d"]);

    form.remove_signatory(2).expect("remove last position");
    assert_eq!(form.signatories, vec!["a", "c"]);
}

#[test]
fn remove_signatory_rejects_out_of_range_and_last_entry() {
    let mut form = CreateWalletForm::default();
    assert_eq!(
        form.remove_signatory(0).expect_err("last entry must stay"),
        FormError::LastSignatory
    );

    form.add_signatory();
    assert_eq!(
        form.remove_signatory(5).expect_err("out of range"),
        FormError::IndexOutOfRange { index: 5, len: 2 }
    );
    assert_eq!(form.signatories.len(), 2);
}

#[test]
fn update_signatory_changes_only_the_target_index() {
    let mut form = CreateWalletForm {
        signatories: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
        required_approvals: 2,
    };

    form.update_signatory(1, "B").expect("update middle");
    assert_eq!(form.signatories, vec!["a", "B", "c"]);
    assert_eq!(form.required_approvals, 2);

    let err = form.update_signatory(3, "x").expect_err("out of range");
    assert!(err.to_string().contains("out of range"));
    assert_eq!(form.signatories, vec!["a", "B", "c"]);
}

#[test]
fn set_required_approvals_does_not_clamp() {
    let mut form = CreateWalletForm::default();
    form.set_required_approvals(7);
    assert_eq!(form.required_approvals, 7);
    form.set_required_approvals(0);
    assert_eq!(form.required_approvals, 0);
}
