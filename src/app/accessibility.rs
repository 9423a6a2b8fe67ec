use leptos::prelude::*;

use crate::state::prefs::{AccessibilityPrefs, Contrast, FontSize, Locale};
use crate::state::AppServices;

use super::tr;

/// Accessibility button plus slide-in panel: text size, contrast, reduced
/// motion, and focus mode, all routed through the preference store.
#[component]
pub fn AccessibilityControls() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let prefs = expect_context::<RwSignal<AccessibilityPrefs>>();
    let locale = expect_context::<RwSignal<Locale>>();
    let (open, set_open) = signal(false);

    let store = services.prefs.clone();
    let step_font = move |larger: bool| {
        store.update_accessibility(|p| {
            p.font_size = if larger {
                p.font_size.larger()
            } else {
                p.font_size.smaller()
            };
        });
    };
    let store = services.prefs.clone();
    let step_contrast = move |higher: bool| {
        store.update_accessibility(|p| {
            p.contrast = if higher {
                p.contrast.higher()
            } else {
                p.contrast.lower()
            };
        });
    };

    let toggle_motion = {
        let store = services.prefs.clone();
        move |_: leptos::ev::MouseEvent| {
            store.update_accessibility(|p| p.reduced_motion = !p.reduced_motion)
        }
    };
    let toggle_focus = {
        let store = services.prefs.clone();
        move |_: leptos::ev::MouseEvent| {
            store.update_accessibility(|p| p.focus_mode = !p.focus_mode)
        }
    };
    let reset = {
        let store = services.prefs.clone();
        move |_: leptos::ev::MouseEvent| store.reset_accessibility()
    };

    view! {
        <button
            class="p-2 rounded-full hover:bg-brightBlack/40 transition-colors"
            aria-label=tr(locale, "a11y.open")
            title=tr(locale, "a11y.open")
            on:click=move |_| set_open.set(true)
        >
            "⚙"
        </button>

        <Show when=move || open.get()>
            <div class="fixed inset-y-0 left-0 z-50 w-80 p-5 bg-background border-r border-muted/30 shadow-2xl overflow-y-auto">
                <div class="flex justify-between items-center mb-6">
                    <h2 class="text-xl font-bold">{tr(locale, "a11y.title")}</h2>
                    <button
                        class="p-2 rounded-full hover:bg-brightBlack/40"
                        aria-label=tr(locale, "a11y.close")
                        on:click=move |_| set_open.set(false)
                    >
                        "✕"
                    </button>
                </div>

                <div class="space-y-6">
                    <div class="bg-brightBlack/20 p-4 rounded-lg">
                        <p class="font-medium mb-3">{tr(locale, "a11y.textSize")}</p>
                        <div class="flex items-center justify-between">
                            <button
                                class="p-2 rounded bg-brightBlack/40 disabled:opacity-50"
                                aria-label=tr(locale, "a11y.textSmaller")
                                disabled=move || prefs.get().font_size == FontSize::Small
                                on:click={
                                    let step = step_font.clone();
                                    move |_| step(false)
                                }
                            >
                                "−"
                            </button>
                            <span class="px-3">{move || prefs.get().font_size.label()}</span>
                            <button
                                class="p-2 rounded bg-brightBlack/40 disabled:opacity-50"
                                aria-label=tr(locale, "a11y.textLarger")
                                disabled=move || prefs.get().font_size == FontSize::XLarge
                                on:click={
                                    let step = step_font.clone();
                                    move |_| step(true)
                                }
                            >
                                "+"
                            </button>
                        </div>
                    </div>

                    <div class="bg-brightBlack/20 p-4 rounded-lg">
                        <p class="font-medium mb-3">{tr(locale, "a11y.contrast")}</p>
                        <div class="flex items-center justify-between">
                            <button
                                class="p-2 rounded bg-brightBlack/40 disabled:opacity-50"
                                aria-label=tr(locale, "a11y.contrastLower")
                                disabled=move || prefs.get().contrast == Contrast::Normal
                                on:click={
                                    let step = step_contrast.clone();
                                    move |_| step(false)
                                }
                            >
                                "−"
                            </button>
                            <span class="px-3">{move || prefs.get().contrast.label()}</span>
                            <button
                                class="p-2 rounded bg-brightBlack/40 disabled:opacity-50"
                                aria-label=tr(locale, "a11y.contrastHigher")
                                disabled=move || prefs.get().contrast == Contrast::Ultra
                                on:click={
                                    let step = step_contrast.clone();
                                    move |_| step(true)
                                }
                            >
                                "+"
                            </button>
                        </div>
                    </div>

                    <ToggleRow
                        label_key="a11y.reducedMotion"
                        enabled=Signal::derive(move || prefs.get().reduced_motion)
                        on_toggle=toggle_motion.clone()
                    />
                    <ToggleRow
                        label_key="a11y.focusMode"
                        enabled=Signal::derive(move || prefs.get().focus_mode)
                        on_toggle=toggle_focus.clone()
                    />

                    <button
                        class="w-full py-2 px-4 rounded bg-brightBlack/40 hover:bg-brightBlack/60 transition-colors"
                        on:click=reset.clone()
                    >
                        {tr(locale, "a11y.reset")}
                    </button>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn ToggleRow(
    label_key: &'static str,
    enabled: Signal<bool>,
    on_toggle: impl Fn(leptos::ev::MouseEvent) + Clone + Send + Sync + 'static,
) -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    view! {
        <button
            class="w-full flex items-center justify-between bg-brightBlack/20 p-4 rounded-lg cursor-pointer"
            role="switch"
            aria-checked=move || enabled.get().to_string()
            on:click=on_toggle
        >
            <span class="font-medium">{tr(locale, label_key)}</span>
            <span class=move || {
                if enabled.get() {
                    "w-12 h-6 rounded-full relative transition-colors duration-300 bg-cyan"
                } else {
                    "w-12 h-6 rounded-full relative transition-colors duration-300 bg-brightBlack/60"
                }
            }>
                <span class=move || {
                    if enabled.get() {
                        "absolute top-0.5 w-5 h-5 rounded-full bg-white translate-x-6 transition-transform duration-300"
                    } else {
                        "absolute top-0.5 w-5 h-5 rounded-full bg-white translate-x-1 transition-transform duration-300"
                    }
                }></span>
            </span>
        </button>
    }
}
