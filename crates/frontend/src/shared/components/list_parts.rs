//! Building blocks bound to a [`ListHandle`], shared by every list page.

use super::filter_panel::{FilterField, FilterPanel, FilterTag};
use super::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::list_controller::ListBackend;
use crate::shared::list_handle::ListHandle;
use crate::shared::list_utils::get_sort_indicator;
use leptos::prelude::*;
use thaw::*;

/// Filter panel with pagination, declared filter fields, optional search box
/// and active filter chips.
#[component]
pub fn ListFilterBar<B: ListBackend>(
    handle: ListHandle<B>,
    /// Placeholder of the search box; no search box when absent
    #[prop(optional, into)]
    search_placeholder: Option<String>,
) -> impl IntoView {
    let is_expanded = RwSignal::new(true);
    let descriptors = handle.controller().filters().descriptors().to_vec();
    let page_size_options = handle.controller().config().page_size_options.clone();

    let search = RwSignal::new(String::new());
    Effect::new(move |_| {
        let term = search.get();
        handle.controller().set_search(&term);
    });

    let apply = move || handle.spawn(|c| async move { c.apply_filters().await });
    let clear = move || {
        search.set(String::new());
        handle.spawn(|c| async move { c.clear_filters().await });
    };

    let fields = descriptors
        .into_iter()
        .map(|descriptor| {
            let name = descriptor.name;
            let value = Signal::derive(move || {
                handle.read(|c| {
                    c.filters()
                        .get(name)
                        .map(|v| v.to_input_value())
                        .unwrap_or_default()
                })
            });
            let on_change = Callback::new(move |raw: String| {
                handle
                    .controller()
                    .set_filter(name, &raw)
                    .err()
                    .map(|e| e.to_string())
            });
            view! { <FilterField descriptor=descriptor value=value on_change=on_change /> }
        })
        .collect_view();

    let tags = move || {
        handle
            .read(|c| c.filters().active_tags())
            .into_iter()
            .map(|(name, label)| {
                let on_remove = Callback::new(move |_| {
                    if handle.controller().set_filter(name, "").is_ok() {
                        apply();
                    }
                });
                view! { <FilterTag label=label on_remove=on_remove /> }
            })
            .collect_view()
    };

    let pagination = move || {
        let page = handle.read(|c| c.pagination());
        view! {
            <PaginationControls
                current_page=Signal::derive(move || page.current_page())
                total_pages=Signal::derive(move || page.total_pages())
                total_count=Signal::derive(move || page.total_items())
                item_range=Signal::derive(move || page.range())
                page_size=Signal::derive(move || page.page_size())
                on_page_change=Callback::new(move |p| handle.controller().go_to_page(p))
                on_page_size_change=Callback::new(move |s| handle.controller().set_page_size(s))
                page_size_options=page_size_options.clone()
            />
        }
    };

    let loading = Signal::derive(move || handle.read(|c| c.status().is_loading()));

    view! {
        <FilterPanel
            is_expanded=is_expanded
            active_filters_count=Signal::derive(move || handle.read(|c| c.active_filter_count()))
            pagination_controls=pagination
            filter_tags=tags
        >
            <Flex gap=FlexGap::Small align=FlexAlign::End>
                {search_placeholder.map(|placeholder| view! {
                    <div style="flex: 1; max-width: 320px;">
                        <Input value=search placeholder=placeholder />
                    </div>
                })}
                {fields}
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| apply()
                    disabled=loading
                >
                    "Aplicar"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| clear()
                    disabled=loading
                >
                    "Limpiar"
                </Button>
            </Flex>
        </FilterPanel>
    }
}

/// Clickable column header toggling the controller's sort
#[component]
pub fn SortableHeader<B: ListBackend>(
    handle: ListHandle<B>,
    field: &'static str,
    label: &'static str,
    #[prop(optional)] min_width: Option<f64>,
) -> impl IntoView {
    let indicator = move || {
        let sort = handle.read(|c| c.sort());
        get_sort_indicator(sort.as_ref().map(|s| (s.field, s.ascending)), field)
    };
    view! {
        <TableHeaderCell min_width=min_width.unwrap_or(80.0)>
            <div
                class="table__sortable-header"
                style="cursor:pointer;"
                on:click=move |_| handle.controller().toggle_sort(field)
            >
                {label}
                <span class="table__sort-indicator">{indicator}</span>
            </div>
        </TableHeaderCell>
    }
}

/// Loading indicator, persistent error banner with retry, load timestamp
#[component]
pub fn ListStatus<B: ListBackend>(handle: ListHandle<B>) -> impl IntoView {
    let retry = move |_| handle.spawn(|c| async move { c.refresh().await });

    view! {
        <div class="list-status">
            {move || handle.read(|c| c.status().is_loading()).then(|| view! {
                <Spinner size=SpinnerSize::Small />
            })}
            {move || handle.read(|c| c.status().error_message().map(str::to_string)).map(|e| view! {
                <div class="alert alert--error">
                    <span>{format!("Los datos mostrados pueden estar desactualizados: {}", e)}</span>
                    <Button appearance=ButtonAppearance::Subtle on_click=retry>
                        {icon("refresh")}
                        " Reintentar"
                    </Button>
                </div>
            })}
            {move || handle.read(|c| c.loaded_at()).map(|at| view! {
                <span class="list-status__timestamp">
                    {format!("Actualizado: {}", at.format("%H:%M:%S"))}
                </span>
            })}
        </div>
    }
}

/// Row shown instead of data when the current view is empty
#[component]
pub fn EmptyRow(colspan: usize) -> impl IntoView {
    view! {
        <TableRow>
            <TableCell attr:colspan=colspan.to_string()>
                <TableCellLayout>
                    <span class="table__empty">"Sin resultados"</span>
                </TableCellLayout>
            </TableCell>
        </TableRow>
    }
}

/// Modal frame of a create/edit dialog.
///
/// The dialog owns no state: `error` and `saving` come from the open edit
/// session, the fields are passed as children.
#[component]
pub fn EditDialog(
    #[prop(into)] title: String,
    #[prop(into)] error: Signal<Option<String>>,
    #[prop(into)] saving: Signal<bool>,
    on_cancel: Callback<()>,
    on_save: Callback<()>,
    children: Children,
) -> impl IntoView {
    // A pending save must settle before the dialog can be dismissed.
    let dismiss = move || {
        if !saving.get_untracked() {
            on_cancel.run(());
        }
    };

    view! {
        <div class="modal-overlay" on:click=move |_| dismiss()>
            <div class="modal" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2 class="modal-title">{title}</h2>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| dismiss()
                        disabled=saving
                    >
                        {icon("x")}
                    </Button>
                </div>

                <div class="modal-body">
                    {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    {children()}
                </div>

                <div class="modal-footer">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| dismiss()
                        disabled=saving
                    >
                        "Cancelar"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| on_save.run(())
                        disabled=saving
                    >
                        {move || if saving.get() { "Guardando..." } else { "Guardar" }}
                    </Button>
                </div>
            </div>
        </div>
    }
}
