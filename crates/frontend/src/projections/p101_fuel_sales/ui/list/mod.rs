use crate::projections::p101_fuel_sales::api::{fetch_pumps, fetch_sales};
use crate::projections::p101_fuel_sales::state::create_state;
use crate::shared::components::date_input::DateInput;
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::stat_card::{StatCard, ValueFormat};
use crate::shared::components::table::{format_money, format_volume};
use crate::shared::components::table_totals_row::TableTotalsRow;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use chrono::NaiveDate;
use contracts::projections::p101_fuel_sales::dto::{FuelSaleDto, NozzleDto};
use contracts::shared::sales_query::{
    aggregate_sales, filter_sales, page_count, paginate, DateRange, NO_SELECTION, PAGE_SIZE,
};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Refresh cadence of the register set
const REFRESH_INTERVAL_MS: u32 = 30_000;

/// Fuel products sold on the forecourt
const FUEL_TYPES: &[&str] = &["PETROL", "DIESEL", "CNG", "LPG"];

const EMPTY_CELL: &str = "\u{2014}";

fn money_cell(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_else(|| EMPTY_CELL.to_string())
}

fn volume_cell(value: Option<f64>) -> String {
    value.map(format_volume).unwrap_or_else(|| EMPTY_CELL.to_string())
}

fn date_cell(sale: &FuelSaleDto) -> String {
    sale.reading_date
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Dropdown label for a nozzle: its label (or id) plus the fuel it dispenses
fn nozzle_label(nozzle: &NozzleDto) -> String {
    let base = nozzle.label.clone().unwrap_or_else(|| nozzle.id.clone());
    match nozzle.fuel_type.as_deref() {
        Some(fuel) => format!("{} ({})", base, fuel),
        None => base,
    }
}

#[component]
pub fn FuelSalesList() -> impl IntoView {
    // "Today" is read once at construction and injected into the state, so
    // everything downstream of it is clock-free
    let today = chrono::Local::now().date_naive();
    let state = create_state(today);

    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);
    let filter_expanded = RwSignal::new(true);

    let load_sales = move || {
        set_loading.set(true);
        set_error.set(None);

        let range = state.with_untracked(|s| s.filter.date_range);
        spawn_local(async move {
            match fetch_sales(&range).await {
                Ok(response) => {
                    state.update(|s| {
                        s.sales = response.items;
                        s.is_loaded = true;
                    });
                    set_loading.set(false);
                }
                Err(e) => {
                    log!("Failed to fetch fuel sales: {}", e);
                    set_error.set(Some(e));
                    set_loading.set(false);
                }
            }
        });
    };

    // Load pump/nozzle reference data once on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match fetch_pumps().await {
                Ok(pumps) => {
                    state.update(|s| s.pumps = pumps);
                }
                Err(e) => {
                    log!("Failed to fetch pumps: {}", e);
                }
            }
        });
    });

    // Refetch whenever the requested date range changes; the Memo dedupes so
    // updating the record set does not re-trigger the fetch
    let fetch_range = Memo::new(move |_| state.with(|s| s.filter.date_range));
    Effect::new(move |_| {
        let _ = fetch_range.get();
        load_sales();
    });

    // Fixed-interval polling; the flag outlives the component and stops the
    // loop after unmount
    let alive = StoredValue::new(true);
    on_cleanup(move || alive.set_value(false));
    spawn_local(async move {
        loop {
            gloo_timers::future::TimeoutFuture::new(REFRESH_INTERVAL_MS).await;
            if !alive.try_get_value().unwrap_or(false) {
                break;
            }
            load_sales();
        }
    });

    // The query pipeline: filter -> aggregate -> paginate, recomputed on
    // every record-set or filter change
    let filtered = Memo::new(move |_| state.with(|s| filter_sales(&s.sales, &s.filter)));
    let totals = Memo::new(move |_| filtered.with(|f| aggregate_sales(f)));
    let total_pages = Signal::derive(move || filtered.with(|f| page_count(f.len(), PAGE_SIZE)));
    let current_page = Signal::derive(move || state.with(|s| s.page));
    let paged_sales = move || {
        let page = state.with(|s| s.page);
        filtered.with(|f| paginate(f, page, PAGE_SIZE).to_vec())
    };

    let active_filters_count = Signal::derive(move || state.with(|s| s.filter.active_count()));

    // Filter field bindings; every mutation goes through apply_filter, which
    // resets the page to 1
    let date_from = Signal::derive(move || {
        state.with(|s| {
            s.filter
                .date_range
                .start
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
    });
    let date_to = Signal::derive(move || {
        state.with(|s| {
            s.filter
                .date_range
                .end
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
    });

    let on_date_from = move |value: String| {
        let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok();
        state.update(|s| s.apply_filter(|f| f.date_range.start = parsed));
    };
    let on_date_to = move |value: String| {
        let parsed = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok();
        state.update(|s| s.apply_filter(|f| f.date_range.end = parsed));
    };
    let on_product_change = move |value: String| {
        state.update(|s| s.apply_filter(|f| f.product_type = value));
    };
    let on_pump_change = move |value: String| {
        state.update(|s| {
            s.apply_filter(|f| {
                f.pump_id = value;
                // Nozzles belong to a pump; reset the selection together
                f.nozzle_id = NO_SELECTION.to_string();
            })
        });
    };
    let on_nozzle_change = move |value: String| {
        state.update(|s| s.apply_filter(|f| f.nozzle_id = value));
    };

    let on_page_change = Callback::new(move |page: usize| {
        state.update(|s| s.page = page);
    });

    let pump_options = Signal::derive(move || {
        state.with(|s| {
            s.pumps
                .iter()
                .map(|p| (p.id.clone(), p.name.clone()))
                .collect::<Vec<_>>()
        })
    });
    let nozzle_options = Signal::derive(move || {
        state.with(|s| {
            if s.filter.pump_id == NO_SELECTION {
                return Vec::new();
            }
            s.pumps
                .iter()
                .find(|p| p.id == s.filter.pump_id)
                .map(|p| {
                    p.nozzles
                        .iter()
                        .map(|n| (n.id.clone(), nozzle_label(n)))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
    });

    let clear_date_range = Callback::new(move |_: ()| {
        state.update(|s| s.apply_filter(|f| f.date_range = DateRange::default()));
    });
    let clear_product = Callback::new(move |_: ()| {
        state.update(|s| s.apply_filter(|f| f.product_type = String::new()));
    });
    let clear_pump = Callback::new(move |_: ()| {
        state.update(|s| {
            s.apply_filter(|f| {
                f.pump_id = NO_SELECTION.to_string();
                f.nozzle_id = NO_SELECTION.to_string();
            })
        });
    });
    let clear_nozzle = Callback::new(move |_: ()| {
        state.update(|s| s.apply_filter(|f| f.nozzle_id = NO_SELECTION.to_string()));
    });

    let revenue = Signal::derive(move || {
        state
            .with(|s| s.is_loaded)
            .then(|| totals.get().total_revenue)
    });
    let volume = Signal::derive(move || {
        state
            .with(|s| s.is_loaded)
            .then(|| totals.get().total_volume)
    });
    let transactions = Signal::derive(move || {
        state
            .with(|s| s.is_loaded)
            .then(|| totals.get().transaction_count as f64)
    });

    view! {
        <div class="page page--fuel-sales">
            <div class="page-header">
                <h1 class="page-header__title">"Fuel sales"</h1>
                <button
                    class="btn btn--secondary"
                    on:click=move |_| load_sales()
                    disabled=move || loading.get()
                >
                    {icon("refresh")}
                    <span>"Refresh"</span>
                </button>
            </div>

            {move || {
                error.get().map(|e| {
                    view! {
                        <div class="alert alert--error">
                            {format!("Failed to load sales: {}", e)}
                        </div>
                    }
                })
            }}

            <div class="stat-cards">
                <StatCard
                    label="Revenue".to_string()
                    icon_name="cash".to_string()
                    value=revenue
                    format=ValueFormat::Money
                />
                <StatCard
                    label="Volume".to_string()
                    icon_name="droplet".to_string()
                    value=volume
                    format=ValueFormat::Liters
                />
                <StatCard
                    label="Transactions".to_string()
                    icon_name="receipt".to_string()
                    value=transactions
                    format=ValueFormat::Integer
                />
            </div>

            <FilterPanel
                is_expanded=filter_expanded
                active_filters_count=active_filters_count
                pagination_controls=move || {
                    view! {
                        <PaginationControls
                            current_page=current_page
                            total_pages=total_pages
                            total_count=Signal::derive(move || filtered.with(|f| f.len()))
                            on_page_change=on_page_change
                        />
                    }
                    .into_any()
                }
            >
                <div class="filter-panel__row">
                    <div class="filter-panel__field">
                        <label>"From"</label>
                        <DateInput value=date_from on_change=on_date_from />
                    </div>
                    <div class="filter-panel__field">
                        <label>"To"</label>
                        <DateInput value=date_to on_change=on_date_to />
                    </div>
                    <div class="filter-panel__field">
                        <label>"Product"</label>
                        <select
                            prop:value=move || state.with(|s| s.filter.product_type.clone())
                            on:change=move |ev| on_product_change(event_target_value(&ev))
                        >
                            <option value="">"All products"</option>
                            {FUEL_TYPES
                                .iter()
                                .map(|fuel| {
                                    view! { <option value=*fuel>{*fuel}</option> }
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="filter-panel__field">
                        <label>"Pump"</label>
                        <select
                            prop:value=move || state.with(|s| s.filter.pump_id.clone())
                            on:change=move |ev| on_pump_change(event_target_value(&ev))
                        >
                            <option value=NO_SELECTION>"All pumps"</option>
                            {move || {
                                pump_options
                                    .get()
                                    .into_iter()
                                    .map(|(id, name)| {
                                        view! { <option value=id>{name}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                    <div class="filter-panel__field">
                        <label>"Nozzle"</label>
                        <select
                            prop:value=move || state.with(|s| s.filter.nozzle_id.clone())
                            on:change=move |ev| on_nozzle_change(event_target_value(&ev))
                            disabled=move || state.with(|s| s.filter.pump_id == NO_SELECTION)
                        >
                            <option value=NO_SELECTION>"All nozzles"</option>
                            {move || {
                                nozzle_options
                                    .get()
                                    .into_iter()
                                    .map(|(id, label)| {
                                        view! { <option value=id>{label}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                </div>

                <div class="filter-tags">
                    {move || {
                        let filter = state.with(|s| s.filter.clone());
                        let mut tags = Vec::new();
                        if let (Some(start), Some(end)) =
                            (filter.date_range.start, filter.date_range.end)
                        {
                            let label = format!(
                                "Period: {} - {}",
                                start.format("%d.%m.%Y"),
                                end.format("%d.%m.%Y")
                            );
                            tags.push(
                                view! { <FilterTag label=label on_remove=clear_date_range /> }
                                    .into_any(),
                            );
                        }
                        if !filter.product_type.is_empty() {
                            let label = format!("Product: {}", filter.product_type);
                            tags.push(
                                view! { <FilterTag label=label on_remove=clear_product /> }
                                    .into_any(),
                            );
                        }
                        if filter.pump_id != NO_SELECTION {
                            let label = format!("Pump: {}", filter.pump_id);
                            tags.push(
                                view! { <FilterTag label=label on_remove=clear_pump /> }
                                    .into_any(),
                            );
                        }
                        if filter.nozzle_id != NO_SELECTION {
                            let label = format!("Nozzle: {}", filter.nozzle_id);
                            tags.push(
                                view! { <FilterTag label=label on_remove=clear_nozzle /> }
                                    .into_any(),
                            );
                        }
                        tags
                    }}
                </div>
            </FilterPanel>

            <div class="table-container">
                <table class="table table--fuel-sales">
                    <thead>
                        <tr>
                            <th>"Date"</th>
                            <th>"Fuel"</th>
                            <th>"Pump"</th>
                            <th>"Nozzle"</th>
                            <th class="table__cell--right">"Volume, L"</th>
                            <th class="table__cell--right">"Unit price"</th>
                            <th class="table__cell--right">"Amount"</th>
                        </tr>
                        <TableTotalsRow>
                            <td colspan="4">
                                {move || format!("Records: {}", totals.get().transaction_count)}
                            </td>
                            <td class="table__cell--right">
                                {move || format_volume(totals.get().total_volume)}
                            </td>
                            <td></td>
                            <td class="table__cell--right">
                                {move || format_money(totals.get().total_revenue)}
                            </td>
                        </TableTotalsRow>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = paged_sales();
                            if rows.is_empty() {
                                let message = if loading.get() {
                                    "Loading..."
                                } else {
                                    "No sales for the selected filters"
                                };
                                view! {
                                    <tr>
                                        <td colspan="7" class="table__cell--empty">{message}</td>
                                    </tr>
                                }
                                .into_any()
                            } else {
                                rows.into_iter()
                                    .map(|sale| {
                                        let date = date_cell(&sale);
                                        let fuel = sale
                                            .fuel_type
                                            .clone()
                                            .unwrap_or_else(|| EMPTY_CELL.to_string());
                                        let pump = sale
                                            .pump_id
                                            .clone()
                                            .unwrap_or_else(|| EMPTY_CELL.to_string());
                                        let nozzle = sale
                                            .nozzle_id
                                            .clone()
                                            .unwrap_or_else(|| EMPTY_CELL.to_string());
                                        view! {
                                            <tr>
                                                <td>{date}</td>
                                                <td>{fuel}</td>
                                                <td>{pump}</td>
                                                <td>{nozzle}</td>
                                                <td class="table__cell--right">
                                                    {volume_cell(sale.delta_volume_l)}
                                                </td>
                                                <td class="table__cell--right">
                                                    {money_cell(sale.unit_price)}
                                                </td>
                                                <td class="table__cell--right">
                                                    {money_cell(sale.total_amount)}
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nozzle(id: &str, fuel_type: Option<&str>, label: Option<&str>) -> NozzleDto {
        NozzleDto {
            id: id.to_string(),
            fuel_type: fuel_type.map(str::to_string),
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn nozzle_label_shows_fuel_type_when_known() {
        let n = nozzle("nz-2", Some("DIESEL"), Some("Nozzle 2"));
        assert_eq!(nozzle_label(&n), "Nozzle 2 (DIESEL)");
    }

    #[test]
    fn nozzle_label_without_fuel_type_is_just_the_label() {
        let n = nozzle("nz-2", None, Some("Nozzle 2"));
        assert_eq!(nozzle_label(&n), "Nozzle 2");
    }

    #[test]
    fn nozzle_label_falls_back_to_id() {
        let n = nozzle("nz-7", Some("CNG"), None);
        assert_eq!(nozzle_label(&n), "nz-7 (CNG)");
    }
}
