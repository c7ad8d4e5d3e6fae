use crate::domain::bus_routes::api::BusRoutesApi;
use crate::domain::bus_routes::ui::details::BusRouteDialog;
use crate::shared::components::list_parts::{EmptyRow, ListFilterBar, ListStatus, SortableHeader};
use crate::shared::icons::icon;
use crate::shared::list_controller::{
    FilterDescriptor, FilterOption, ListConfig, ListRecord, PageResetPolicy,
};
use crate::shared::list_handle::ListHandle;
use crate::shared::list_utils::highlight_matches;
use contracts::domain::bus_routes::BusRoute;
use leptos::prelude::*;
use thaw::*;

pub fn routes_filters() -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor::text("origen", "Origen").with_max_len(80),
        FilterDescriptor::text("destino", "Destino").with_max_len(80),
        FilterDescriptor::number("distancia_max", "Distancia máx. (km)").with_min(0.0),
        FilterDescriptor::select(
            "activa",
            "Estado",
            vec![
                FilterOption::new("true", "Activa"),
                FilterOption::new("false", "Suspendida"),
            ],
        ),
    ]
}

/// Every change of the list returns to page 1
pub fn routes_config() -> ListConfig {
    ListConfig::new("Ruta", "rutas")
        .with_reset_policy(PageResetPolicy::ResetToFirst)
        .with_sort("codigo", true)
}

#[component]
pub fn BusRoutesList() -> impl IntoView {
    let handle = ListHandle::mount(BusRoutesApi, routes_filters(), routes_config());

    let page = Signal::derive(move || handle.read(|c| c.page()));
    let search = Signal::derive(move || handle.read(|c| c.search()));
    let loading = Signal::derive(move || handle.read(|c| c.status().is_loading()));
    let dialog_key = Memo::new(move |_| {
        handle.read(|c| c.edit_session().map(|s| s.generation))
    });

    let row = move |route: BusRoute| {
        let id = route.record_id();
        let id_for_delete = id.clone();
        let edit_id = id.clone();
        let busy = Signal::derive(move || handle.read(|c| c.is_in_flight(&id)));
        let mark = move |text: &str| highlight_matches(text, &search.get_untracked());
        let distance = route
            .distance_km
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| "-".to_string());
        view! {
            <TableRow>
                <TableCell>
                    <TableCellLayout>
                        <span style="font-weight: 500;">{mark(&route.code)}</span>
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>{mark(&route.name)}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>{mark(&route.origin)}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>{mark(&route.destination)}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>{distance}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>
                        {if route.active {
                            view! { <span class="badge badge--success">"Activa"</span> }.into_any()
                        } else {
                            view! { <span class="badge badge--warning">"Suspendida"</span> }.into_any()
                        }}
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| {
                            handle.controller().open_edit(&edit_id);
                        }
                        attr:title="Editar"
                    >
                        {icon("edit")}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        disabled=busy
                        on_click=move |_| {
                            let id = id_for_delete.clone();
                            handle.spawn(|c| async move { c.delete(&id).await });
                        }
                        attr:title="Eliminar"
                    >
                        {icon("trash")}
                    </Button>
                </TableCell>
            </TableRow>
        }
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Rutas"</h1>
                    <Badge>
                        {move || page.get().total_items.to_string()}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| handle.controller().open_create()
                    >
                        {icon("plus")}
                        " Nueva"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| handle.spawn(|c| async move { c.refresh().await })
                        disabled=loading
                    >
                        {icon("refresh")}
                        " Actualizar"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ListStatus handle=handle />
                <ListFilterBar handle=handle search_placeholder="Código, nombre, origen o destino..." />

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortableHeader handle=handle field="codigo" label="Código" min_width=90.0 />
                                <SortableHeader handle=handle field="nombre" label="Nombre" min_width=160.0 />
                                <SortableHeader handle=handle field="origen" label="Origen" min_width=140.0 />
                                <SortableHeader handle=handle field="destino" label="Destino" min_width=140.0 />
                                <SortableHeader handle=handle field="distancia_km" label="Km" />
                                <SortableHeader handle=handle field="activa" label="Estado" />
                                <TableHeaderCell min_width=90.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                let current = page.get();
                                if current.is_empty() {
                                    view! { <EmptyRow colspan=7 /> }.into_any()
                                } else {
                                    current.items.into_iter().map(row).collect_view().into_any()
                                }
                            }}
                        </TableBody>
                    </Table>
                </div>

                {move || {
                    dialog_key
                        .get()
                        .and_then(|_| handle.controller().edit_session())
                        .map(|session| view! { <BusRouteDialog handle=handle session=session /> })
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_controller::filter_state::FilterState;
    use crate::shared::list_controller::FilterError;

    #[test]
    fn test_routes_filters() {
        let mut state = FilterState::new(routes_filters());
        state.set_filter("distancia_max", "25,5").unwrap_err();
        state.set_filter("distancia_max", "25.5").unwrap();
        state.set_filter("activa", "true").unwrap();
        assert!(matches!(
            state.set_filter("distancia_max", "-1"),
            Err(FilterError::OutOfRange { .. })
        ));

        let params = state.build_query_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params["distancia_max"], "25.5");
    }

    #[test]
    fn test_routes_reset_to_first_page() {
        assert_eq!(routes_config().reset_policy, PageResetPolicy::ResetToFirst);
    }
}
