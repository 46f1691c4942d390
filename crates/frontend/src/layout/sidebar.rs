//! Sidebar navigation

use crate::shared::icons::icon;
use leptos::prelude::*;
use leptos_router::components::A;

struct MenuItem {
    path: &'static str,
    label: &'static str,
    icon: &'static str,
}

fn menu_items() -> Vec<MenuItem> {
    vec![MenuItem {
        path: "/sales",
        label: "Sales register",
        icon: "cash",
    }]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <nav class="sidebar">
            <ul class="sidebar__menu">
                {menu_items()
                    .into_iter()
                    .map(|item| {
                        view! {
                            <li class="sidebar__item">
                                <A href=item.path attr:class="sidebar__link">
                                    {icon(item.icon)}
                                    <span>{item.label}</span>
                                </A>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}
