use crate::domain::emergency::api::EmergencyApi;
use crate::shared::components::list_parts::{EmptyRow, ListFilterBar, ListStatus, SortableHeader};
use crate::shared::icons::icon;
use crate::shared::list_controller::{
    ConfirmRequest, FilterDescriptor, FilterOption, ListConfig, ListRecord, PageResetPolicy,
    RowAction,
};
use crate::shared::list_handle::ListHandle;
use crate::shared::list_utils::highlight_matches;
use contracts::domain::emergency::{EmergencyStatus, EmergencyUnit};
use leptos::prelude::*;
use thaw::*;

pub fn emergency_filters() -> Vec<FilterDescriptor> {
    let statuses = [
        EmergencyStatus::Operational,
        EmergencyStatus::Active,
        EmergencyStatus::OutOfService,
    ];
    vec![
        FilterDescriptor::select(
            "estado",
            "Estado",
            statuses
                .into_iter()
                .map(|s| FilterOption::new(s.as_str(), s.label()))
                .collect(),
        ),
        FilterDescriptor::text("ruta", "Ruta").with_max_len(80),
    ]
}

pub fn emergency_config() -> ListConfig {
    ListConfig::new("Unidad", "unidades")
        .with_reset_policy(PageResetPolicy::ClampToLast)
        .with_sort("numero_unidad", true)
}

pub fn activation_action(unit: &EmergencyUnit) -> RowAction {
    let name = unit.display_name();
    RowAction {
        confirm: ConfirmRequest::new(
            "Activar servicio de emergencia",
            format!(
                "¿Activar el servicio de emergencia para la {}? La unidad quedará fuera de su ruta.",
                name
            ),
        ),
        success_title: "Emergencia activada".to_string(),
        success_message: format!("{} está en servicio de emergencia", name),
    }
}

fn status_badge(status: EmergencyStatus) -> AnyView {
    let class = match status {
        EmergencyStatus::Operational => "badge badge--success",
        EmergencyStatus::Active => "badge badge--error",
        EmergencyStatus::OutOfService => "badge badge--neutral",
    };
    view! { <span class=class>{status.label()}</span> }.into_any()
}

#[component]
pub fn EmergencyList() -> impl IntoView {
    let handle = ListHandle::mount(EmergencyApi, emergency_filters(), emergency_config());

    let page = Signal::derive(move || handle.read(|c| c.page()));
    let search = Signal::derive(move || handle.read(|c| c.search()));
    let loading = Signal::derive(move || handle.read(|c| c.status().is_loading()));
    let active_count = Signal::derive(move || {
        handle.read(|c| {
            c.collection()
                .iter()
                .filter(|u| u.status == EmergencyStatus::Active)
                .count()
        })
    });

    let row = move |unit: EmergencyUnit| {
        let id = unit.record_id();
        let id_for_action = id.clone();
        let can_activate = unit.can_activate();
        let busy = Signal::derive(move || handle.read(|c| c.is_in_flight(&id)));
        let disabled = Signal::derive(move || busy.get() || !can_activate);
        let action = activation_action(&unit);
        let mark = move |text: &str| highlight_matches(text, &search.get_untracked());
        let activated_at = unit.activated_at.clone().unwrap_or_else(|| "-".to_string());
        view! {
            <TableRow>
                <TableCell>
                    <TableCellLayout>
                        <span style="font-weight: 500;">{mark(&unit.unit_number)}</span>
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>{mark(&unit.plate)}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>
                        {mark(unit.route_name.as_deref().unwrap_or(""))}
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>{status_badge(unit.status)}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>{activated_at}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=disabled
                        on_click=move |_| {
                            let id = id_for_action.clone();
                            let action = action.clone();
                            handle.spawn(|c| async move {
                                c.run_action(&id, action, |api, id| async move {
                                    api.activate(&id).await
                                })
                                .await
                            });
                        }
                    >
                        {move || if busy.get() {
                            view! { <Spinner size=SpinnerSize::Small /> }.into_any()
                        } else {
                            icon("siren")
                        }}
                        " Activar"
                    </Button>
                </TableCell>
            </TableRow>
        }
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Emergencias"</h1>
                    <Badge>
                        {move || page.get().total_items.to_string()}
                    </Badge>
                    {move || {
                        let n = active_count.get();
                        (n > 0).then(|| view! {
                            <span class="badge badge--error">{format!("{} en emergencia", n)}</span>
                        })
                    }}
                </div>
                <div class="page__header-right">
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
                <ListFilterBar handle=handle search_placeholder="Placa, número o ruta..." />

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortableHeader handle=handle field="numero_unidad" label="Unidad" min_width=80.0 />
                                <SortableHeader handle=handle field="placa" label="Placa" min_width=100.0 />
                                <SortableHeader handle=handle field="ruta" label="Ruta" min_width=160.0 />
                                <SortableHeader handle=handle field="estado" label="Estado" />
                                <TableHeaderCell min_width=140.0>"Activada"</TableHeaderCell>
                                <TableHeaderCell min_width=120.0>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                let current = page.get();
                                if current.is_empty() {
                                    view! { <EmptyRow colspan=6 /> }.into_any()
                                } else {
                                    current.items.into_iter().map(row).collect_view().into_any()
                                }
                            }}
                        </TableBody>
                    </Table>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_controller::filter_state::FilterState;

    #[test]
    fn test_activation_action_names_the_unit() {
        let unit = EmergencyUnit {
            plate: "AB-1234".into(),
            unit_number: "12".into(),
            route_name: Some("Costera".into()),
            status: EmergencyStatus::Operational,
            activated_at: None,
        };
        let action = activation_action(&unit);
        assert!(action.confirm.message.contains("Unidad 12 (AB-1234)"));
        assert!(action.success_message.starts_with("Unidad 12"));
    }

    #[test]
    fn test_status_filter_uses_wire_values() {
        let mut state = FilterState::new(emergency_filters());
        state.set_filter("estado", "en_emergencia").unwrap();
        assert!(state.set_filter("estado", "Activa").is_err());
        assert_eq!(state.build_query_params()["estado"], "en_emergencia");
    }
}
