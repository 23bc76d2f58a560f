use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipKind {
    Info,
    Success,
    Error,
}

impl TipKind {
    pub fn class(&self) -> &'static str {
        match self {
            TipKind::Info => "info",
            TipKind::Success => "success",
            TipKind::Error => "error",
        }
    }
}

/// A transient notification. Whoever shows one overwrites whatever was there
/// before; the auto-clear timer is armed by `use_tip_autoclear`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub text: String,
    pub kind: TipKind,
}

pub fn show_tip(mut slot: Signal<Option<Tip>>, text: impl Into<String>, kind: TipKind) {
    slot.set(Some(Tip {
        text: text.into(),
        kind,
    }));
}

/// Clears the tip slot three seconds after anything is shown in it. Each show
/// arms a fresh timer and an old timer clears whatever is current, matching
/// the plain setTimeout semantics the backend team expects.
pub fn use_tip_autoclear(mut slot: Signal<Option<Tip>>) {
    use_effect(move || {
        if slot.read().is_some() {
            spawn(async move {
                gloo_timers::future::sleep(std::time::Duration::from_secs(3)).await;
                slot.set(None);
            });
        }
    });
}

#[component]
pub fn TipView(slot: Signal<Option<Tip>>) -> Element {
    let tip = slot.read().clone();
    rsx! {
        if let Some(tip) = tip {
            p { class: "tip {tip.kind.class()}", "{tip.text}" }
        } else {
            p { class: "tip" }
        }
    }
}
