use leptos::prelude::*;

use crate::state::notify::{Notification, NotificationKind};
use crate::state::AppServices;

/// Floating toast stack, oldest at the top, newest appended last.
#[component]
pub fn ToastStack() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let toasts = expect_context::<RwSignal<Vec<Notification>>>();

    view! {
        <div
            class="fixed bottom-4 right-4 z-50 flex flex-col gap-2 max-w-sm w-full pointer-events-none"
            aria-live="polite"
        >
            {move || {
                let bus = services.notifications.clone();
                toasts
                    .get()
                    .into_iter()
                    .map(|notification| {
                        let id = notification.id;
                        let bus = bus.clone();
                        view! {
                            <div
                                class=format!(
                                    "pointer-events-auto rounded-lg shadow-lg p-4 border-l-4 backdrop-blur-md flex items-start gap-3 {}",
                                    kind_classes(notification.kind),
                                )
                                role="status"
                            >
                                <span class="flex-shrink-0 font-bold" aria-hidden="true">
                                    {notification.kind.icon()}
                                </span>
                                <p class="flex-1 text-sm whitespace-pre-wrap">
                                    {notification.message.clone()}
                                </p>
                                <button
                                    class="flex-shrink-0 text-muted hover:text-foreground transition-colors"
                                    aria-label="Close notification"
                                    on:click=move |_| bus.dismiss(id)
                                >
                                    "✕"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

fn kind_classes(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "border-green bg-green/10 text-green",
        NotificationKind::Error => "border-red bg-red/10 text-red",
        NotificationKind::Info => "border-blue bg-blue/10 text-blue",
        NotificationKind::Warning => "border-yellow bg-yellow/10 text-yellow",
    }
}
