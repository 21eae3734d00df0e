//! Contact form submission.

use std::rc::Rc;

use portico_core::{ContactForm, FormCfg, FormHandle, FormSlot, Notifier, PageConfig};
use web_sys::{Document, HtmlFormElement};

use crate::dom;
use crate::node::WebNode;

pub struct WebForm(HtmlFormElement);

impl FormHandle for WebForm {
    fn reset(&self) {
        self.0.reset();
    }
}

/// Confirmation through `window.alert`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        if let Some(win) = dom::window() {
            let _ = win.alert_with_message(message);
        }
    }
}

pub type WebContactForm = ContactForm<WebNode, WebForm, AlertNotifier>;

fn fields(doc: &Document, cfg: &FormCfg) -> Vec<FormSlot<WebNode>> {
    cfg.fields
        .iter()
        .map(|id| {
            let node = WebNode::by_id(doc, id);
            if node.is_none() {
                log::warn!("contact form field #{id} not found; submissions will be rejected");
            }
            (id.clone(), node)
        })
        .collect()
}

/// Intercept submission of the contact form, if the page has one.
pub fn mount(doc: &Document, cfg: &PageConfig) -> Option<Rc<WebContactForm>> {
    let form = dom::element_by_id::<HtmlFormElement>(doc, &cfg.ids.contact_form)?;
    let contact = Rc::new(ContactForm::new(
        fields(doc, &cfg.form),
        WebForm(form.clone()),
        AlertNotifier,
        &cfg.form,
    ));
    let on_submit = Rc::clone(&contact);
    dom::listen(&form, "submit", move |event| {
        event.prevent_default();
        on_submit.submit();
    });
    Some(contact)
}
