use crate::shared::icons::icon;
use leptos::prelude::*;

/// Top application bar with the station title
#[component]
pub fn TopHeader() -> impl IntoView {
    view! {
        <header class="top-header">
            <div class="top-header__brand">
                {icon("fuel")}
                <span class="top-header__title">"Station Dashboard"</span>
            </div>
        </header>
    }
}
