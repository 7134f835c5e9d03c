//! Property tests for feedback rendering and the submission lifecycle
//!
//! Checks that, for arbitrary error maps and response sequences:
//! 1. Every message is accumulated, and inline labels exist only for known fields
//! 2. Clearing feedback restores the pristine form and is idempotent
//! 3. The button is never left disabled once a request completes

use ajax_validation::prelude::*;
use http::StatusCode;
use proptest::prelude::*;

const FIELDS: [&str; 3] = ["email", "name", "phone"];

fn page() -> (Document, NodeId) {
    let mut doc = Document::new().with_base_url("https://example.com/");
    let root = doc.root();
    let form = FormBuilder::new("/contact")
        .csrf_token("tok")
        .field("email", InputType::Email)
        .label("Email")
        .done()
        .field("name", InputType::Text)
        .label("Name")
        .done()
        .field("phone", InputType::Tel)
        .label("Phone")
        .done()
        .submit("Send")
        .mount(&mut doc, root);
    (doc, form)
}

fn error_map() -> impl Strategy<Value = ErrorMap> {
    let field = prop_oneof![
        proptest::sample::select(FIELDS.to_vec()).prop_map(str::to_string),
        "[a-z]{1,8}_x",
    ];
    proptest::collection::vec((field, proptest::collection::vec("[ -~]{0,24}", 0..4)), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Dummy transport; the split `begin`/`complete` API never calls it
struct Unused;

#[async_trait::async_trait]
impl Transport for Unused {
    async fn send(&self, _request: SubmitRequest) -> Result<SubmitResponse, AjaxFormError> {
        Err(AjaxFormError::MissingAction)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_every_message_is_accumulated(errors in error_map(), inline in any::<bool>()) {
        let (mut doc, form) = page();
        let options = FormOptions::default()
            .with_error_list(true)
            .with_inline_errors(inline);
        let mut controller = FormController::new(&doc, form, options).unwrap();

        controller.process_errors(&mut doc, &errors);

        prop_assert_eq!(controller.errors().len(), errors.count());

        let known: usize = errors
            .iter()
            .filter(|(field, _)| FIELDS.contains(field))
            .map(|(_, messages)| messages.len())
            .sum();
        let labels = doc.select(form, &Selector::tag("label").and_class("error")).len();
        prop_assert_eq!(labels, if inline { known } else { 0 });

        let items = doc.select(form, &Selector::tag("li")).len();
        prop_assert_eq!(items, errors.count());
    }

    #[test]
    fn test_clear_feedback_restores_pristine_form(
        errors in error_map(),
        message in "[ -~]{0,24}",
    ) {
        let (mut doc, form) = page();
        let pristine = doc.outer_html(doc.root());
        let mut controller =
            FormController::new(&doc, form, FormOptions::default().with_error_list(true)).unwrap();

        controller.add_message(&mut doc, &message).process_errors(&mut doc, &errors);
        controller.clear_feedback(&mut doc);
        let once = doc.outer_html(doc.root());
        controller.clear_feedback(&mut doc);

        prop_assert_eq!(&once, &pristine);
        prop_assert_eq!(doc.outer_html(doc.root()), once);
        prop_assert!(controller.errors().is_empty());
    }

    #[test]
    fn test_button_is_released_after_every_failure(
        statuses in proptest::collection::vec(prop_oneof![Just(200_u16), 400_u16..600], 1..6),
    ) {
        let (mut doc, form) = page();
        let options = FormOptions::default().with_disable_resubmit(false);
        let mut ajax = AjaxForm::attach(&doc, form, options, Unused).unwrap();

        for status in statuses {
            let request = ajax.begin(&mut doc, &mut SubmitEvent::new());
            if ajax.state() == SubmissionState::Succeeded {
                prop_assert!(request.is_none());
                break;
            }
            prop_assert!(request.is_some());
            prop_assert!(ajax.controller().button().is_disabled(&doc));

            let status = StatusCode::from_u16(status).unwrap();
            ajax.complete(&mut doc, Ok(SubmitResponse::new(status, None)));

            let expected = if status.is_success() {
                SubmissionState::Succeeded
            } else {
                SubmissionState::Failed
            };
            prop_assert_eq!(ajax.state(), expected);
            prop_assert!(!ajax.controller().button().is_disabled(&doc));
        }
    }
}
