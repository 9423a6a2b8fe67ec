use leptos::task::spawn_local;
use leptos::{
    html::{Input, Textarea},
    prelude::*,
};
use leptos_meta::Title;

use crate::email::{self, ContactMessage, RelayConfig};
use crate::i18n::translate;
use crate::state::prefs::Locale;
use crate::state::AppServices;

use super::tr;

#[component]
pub fn ContactPage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let locale = expect_context::<RwSignal<Locale>>();

    let name_ref = NodeRef::<Input>::new();
    let email_ref = NodeRef::<Input>::new();
    let subject_ref = NodeRef::<Input>::new();
    let message_ref = NodeRef::<Textarea>::new();
    let (sending, set_sending) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        let (Some(name_el), Some(email_el), Some(subject_el), Some(message_el)) = (
            name_ref.get_untracked(),
            email_ref.get_untracked(),
            subject_ref.get_untracked(),
            message_ref.get_untracked(),
        ) else {
            return;
        };

        let message = ContactMessage {
            name: name_el.value(),
            email: email_el.value(),
            subject: subject_el.value(),
            message: message_el.value(),
        };

        // Broken input never leaves the page; the relay only sees plausible
        // submissions.
        if let Err(err) = email::validate(&message) {
            services
                .notifications
                .error(translate(locale.get_untracked(), err.message_key()));
            return;
        }

        set_sending.set(true);
        let services = services.clone();
        spawn_local(async move {
            let result = email::send(&RelayConfig::default(), &message).await;
            let current = locale.get_untracked();
            match result {
                Ok(()) => {
                    services.analytics.event("contact_submit", "ok");
                    services
                        .notifications
                        .success(translate(current, "contact.formSuccess"));
                    name_el.set_value("");
                    email_el.set_value("");
                    subject_el.set_value("");
                    message_el.set_value("");
                }
                Err(err) => {
                    // No automatic retry; the user resubmits when ready.
                    log::error!("contact form delivery failed: {err}");
                    services.analytics.event("contact_submit", "error");
                    services
                        .notifications
                        .error(translate(current, "contact.formError"));
                }
            }
            set_sending.set(false);
        });
    };

    let field_class = "w-full px-4 py-2 rounded-md border border-muted focus:outline-none focus:ring-2 focus:ring-cyan focus:border-cyan bg-background text-foreground placeholder-muted transition-all duration-200";

    view! {
        <Title text="Contact" />
        <div class="max-w-2xl mx-auto py-12 w-full">
            <h1 class="text-4xl font-bold mb-2">{tr(locale, "contact.title")}</h1>
            <p class="text-muted mb-10">{tr(locale, "contact.subtitle")}</p>

            <form class="space-y-6" on:submit=on_submit>
                <div class="grid sm:grid-cols-2 gap-6">
                    <div>
                        <label for="contact_name" class="block mb-2 font-medium">
                            {tr(locale, "contact.formName")}
                        </label>
                        <input id="contact_name" node_ref=name_ref class=field_class />
                    </div>
                    <div>
                        <label for="contact_email" class="block mb-2 font-medium">
                            {tr(locale, "contact.formEmail")}
                        </label>
                        <input
                            id="contact_email"
                            type="email"
                            node_ref=email_ref
                            class=field_class
                        />
                    </div>
                </div>
                <div>
                    <label for="contact_subject" class="block mb-2 font-medium">
                        {tr(locale, "contact.formSubject")}
                    </label>
                    <input id="contact_subject" node_ref=subject_ref class=field_class />
                </div>
                <div>
                    <label for="contact_message" class="block mb-2 font-medium">
                        {tr(locale, "contact.formMessage")}
                    </label>
                    <textarea
                        id="contact_message"
                        node_ref=message_ref
                        rows="6"
                        class=field_class
                    ></textarea>
                </div>
                <button
                    type="submit"
                    class="px-6 py-3 rounded-md bg-cyan/20 hover:bg-cyan/30 text-cyan border border-cyan/30 font-medium transition-all duration-200 disabled:opacity-50"
                    disabled=move || sending.get()
                >
                    {move || {
                        let key = if sending.get() {
                            "contact.formSending"
                        } else {
                            "contact.formSubmit"
                        };
                        translate(locale.get(), key)
                    }}
                </button>
            </form>

            <div class="mt-12 text-center text-sm text-muted">
                <button
                    class="text-cyan hover:text-brightCyan"
                    title="hello@nadiabelkacem.dev"
                    onclick="navigator.clipboard.writeText('hello@nadiabelkacem.dev').then(() => alert('📋 hello@nadiabelkacem.dev'))"
                >
                    {tr(locale, "contact.copyEmail")}
                </button>
            </div>
        </div>
    }
}
