use crate::layout::Shell;
use crate::projections::p101_fuel_sales::ui::list::FuelSalesList;
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Router>
            <Shell>
                <Routes fallback=|| view! { <p class="page-error">"Page not found"</p> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/sales" /> } />
                    <Route path=path!("/sales") view=FuelSalesList />
                </Routes>
            </Shell>
        </Router>
    }
}
