use crate::shared::icons::icon;
use crate::shared::list_controller::{FilterDescriptor, FilterKind};
use leptos::prelude::*;

/// FilterPanel component - collapsible filter panel with pagination in the header
#[component]
pub fn FilterPanel(
    /// Whether the filter panel is expanded
    #[prop(into)]
    is_expanded: RwSignal<bool>,

    /// Number of active filters (for badge display)
    #[prop(into)]
    active_filters_count: Signal<usize>,

    /// Pagination controls shown in the header
    #[prop(into)]
    pagination_controls: ViewFn,

    /// Active filter chips under the fields
    #[prop(into)]
    filter_tags: ViewFn,

    /// Filter content (form fields)
    children: Children,
) -> impl IntoView {
    let toggle_expanded = move |_| {
        is_expanded.update(|e| *e = !*e);
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div
                    class="filter-panel-header__left"
                    on:click=toggle_expanded
                >
                    <span class=move || {
                        if is_expanded.get() {
                            "filter-panel__chevron filter-panel__chevron--expanded"
                        } else {
                            "filter-panel__chevron"
                        }
                    }>
                        {icon("chevron-down")}
                    </span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Filtros"</span>
                    {move || {
                        let count = active_filters_count.get();
                        if count > 0 {
                            view! {
                                <span class="badge badge--primary">{count}</span>
                            }.into_any()
                        } else {
                            view! { <></> }.into_any()
                        }
                    }}
                </div>
                <div class="filter-panel-header__center">
                    {pagination_controls.run()}
                </div>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">
                    {children()}
                    <div class="filter-tags">{filter_tags.run()}</div>
                </div>
            </div>
        </div>
    }
}

/// FilterTag component - individual filter tag/chip
#[component]
pub fn FilterTag(
    /// Tag label
    #[prop(into)]
    label: String,

    /// Callback when remove is clicked
    on_remove: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span
                class="filter-tag__remove"
                title="Quitar filtro"
                on:click=move |e| {
                    e.stop_propagation();
                    on_remove.run(());
                }
            >
                {icon("x")}
            </span>
        </div>
    }
}

/// One input for a declared filter, rendered according to its kind.
///
/// `on_change` gets the raw text and answers with a validation message when
/// the value was rejected.
#[component]
pub fn FilterField(
    descriptor: FilterDescriptor,
    /// Current value as input text
    #[prop(into)]
    value: Signal<String>,
    on_change: Callback<String, Option<String>>,
) -> impl IntoView {
    let error = RwSignal::new(None::<String>);
    let submit = move |raw: String| error.set(on_change.run(raw));

    let input = match descriptor.kind {
        FilterKind::Select => {
            let options = descriptor
                .options
                .iter()
                .map(|opt| {
                    let v = opt.value.clone();
                    view! {
                        <option value=opt.value.clone() selected=move || value.get() == v>
                            {opt.label.clone()}
                        </option>
                    }
                })
                .collect_view();
            view! {
                <select
                    class="filter-field__input"
                    on:change=move |ev| submit(event_target_value(&ev))
                    prop:value=move || value.get()
                >
                    <option value="">"Todos"</option>
                    {options}
                </select>
            }
            .into_any()
        }
        FilterKind::Date => view! {
            <input
                type="date"
                class="filter-field__input"
                on:change=move |ev| submit(event_target_value(&ev))
                prop:value=move || value.get()
            />
        }
        .into_any(),
        FilterKind::Number => {
            let min = descriptor.constraints.min.map(|v| v.to_string());
            let max = descriptor.constraints.max.map(|v| v.to_string());
            view! {
                <input
                    type="number"
                    step="any"
                    min=min
                    max=max
                    class="filter-field__input"
                    on:change=move |ev| submit(event_target_value(&ev))
                    prop:value=move || value.get()
                />
            }
            .into_any()
        }
        FilterKind::Text => {
            let max_len = descriptor.constraints.max_len.map(|v| v.to_string());
            view! {
                <input
                    type="text"
                    maxlength=max_len
                    class="filter-field__input"
                    on:input=move |ev| submit(event_target_value(&ev))
                    prop:value=move || value.get()
                />
            }
            .into_any()
        }
    };

    view! {
        <div class="filter-field">
            <label class="filter-field__label">{descriptor.label}</label>
            {input}
            {move || error.get().map(|e| view! { <div class="filter-field__error">{e}</div> })}
        </div>
    }
}
