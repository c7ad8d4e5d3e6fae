use crate::domain::roles::api::RolesApi;
use crate::domain::roles::ui::details::RoleDialog;
use crate::shared::components::list_parts::{EmptyRow, ListFilterBar, ListStatus, SortableHeader};
use crate::shared::icons::icon;
use crate::shared::list_controller::{
    FilterDescriptor, FilterOption, ListConfig, ListRecord, PageResetPolicy,
};
use crate::shared::list_handle::ListHandle;
use crate::shared::list_utils::highlight_matches;
use contracts::domain::roles::Role;
use leptos::prelude::*;
use thaw::*;

pub fn roles_filters() -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor::text("nombre", "Nombre").with_max_len(60),
        FilterDescriptor::select(
            "activo",
            "Estado",
            vec![
                FilterOption::new("true", "Activo"),
                FilterOption::new("false", "Inactivo"),
            ],
        ),
    ]
}

pub fn roles_config() -> ListConfig {
    ListConfig::new("Rol", "roles")
        .with_reset_policy(PageResetPolicy::ClampToLast)
        .with_sort("id", true)
}

#[component]
pub fn RolesList() -> impl IntoView {
    let handle = ListHandle::mount(RolesApi, roles_filters(), roles_config());

    let page = Signal::derive(move || handle.read(|c| c.page()));
    let search = Signal::derive(move || handle.read(|c| c.search()));
    let loading = Signal::derive(move || handle.read(|c| c.status().is_loading()));
    let dialog_key = Memo::new(move |_| {
        handle.read(|c| c.edit_session().map(|s| s.generation))
    });

    let row = move |role: Role| {
        let id = role.record_id();
        let id_for_delete = id.clone();
        let busy = Signal::derive(move || handle.read(|c| c.is_in_flight(&id)));
        let mark = move |text: &str| highlight_matches(text, &search.get_untracked());
        let edit_id = role.record_id();
        view! {
            <TableRow>
                <TableCell>
                    <TableCellLayout>{role.id}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>
                        <span style="font-weight: 500;">{mark(&role.name)}</span>
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>
                        {mark(role.description.as_deref().unwrap_or(""))}
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>
                        {if role.active {
                            view! { <span class="badge badge--success">"Activo"</span> }.into_any()
                        } else {
                            view! { <span class="badge badge--neutral">"Inactivo"</span> }.into_any()
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
                    <h1 class="page__title">"Roles"</h1>
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
                        " Nuevo"
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
                <ListFilterBar handle=handle search_placeholder="Nombre o descripción..." />

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortableHeader handle=handle field="id" label="ID" min_width=60.0 />
                                <SortableHeader handle=handle field="nombre" label="Nombre" min_width=160.0 />
                                <TableHeaderCell min_width=200.0>"Descripción"</TableHeaderCell>
                                <SortableHeader handle=handle field="activo" label="Estado" />
                                <TableHeaderCell min_width=90.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                let current = page.get();
                                if current.is_empty() {
                                    view! { <EmptyRow colspan=5 /> }.into_any()
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
                        .map(|session| view! { <RoleDialog handle=handle session=session /> })
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_controller::filter_state::FilterState;

    #[test]
    fn test_roles_filters_map_to_query() {
        let mut state = FilterState::new(roles_filters());
        state.set_filter("activo", "false").unwrap();
        state.set_filter("nombre", " Mec ").unwrap();
        let params = state.build_query_params();
        assert_eq!(params["activo"], "false");
        assert_eq!(params["nombre"], "Mec");
    }

    #[test]
    fn test_roles_config() {
        let config = roles_config();
        assert_eq!(config.reset_policy, PageResetPolicy::ClampToLast);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.labels.singular, "Rol");
    }
}
