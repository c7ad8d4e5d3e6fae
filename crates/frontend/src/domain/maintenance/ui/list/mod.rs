use crate::domain::maintenance::api::MaintenanceApi;
use crate::domain::maintenance::summary::summarize;
use crate::domain::maintenance::ui::details::MaintenanceDialog;
use crate::shared::components::list_parts::{EmptyRow, ListFilterBar, ListStatus, SortableHeader};
use crate::shared::components::stat_card::{format_money, StatCard, ValueFormat};
use crate::shared::icons::icon;
use crate::shared::list_controller::{
    FilterDescriptor, FilterOption, ListConfig, ListRecord, PageResetPolicy,
};
use crate::shared::list_handle::ListHandle;
use crate::shared::list_utils::highlight_matches;
use contracts::domain::maintenance::{MaintenanceKind, MaintenanceRecord};
use leptos::prelude::*;
use thaw::*;

pub fn maintenance_filters() -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor::select(
            "tipo",
            "Tipo",
            MaintenanceKind::ALL
                .into_iter()
                .map(|k| FilterOption::new(k.as_str(), k.label()))
                .collect(),
        ),
        FilterDescriptor::date("fecha_desde", "Desde"),
        FilterDescriptor::date("fecha_hasta", "Hasta"),
        FilterDescriptor::number("costo_min", "Costo mín.").with_min(0.0),
        FilterDescriptor::text("unidad", "Unidad").with_max_len(20),
    ]
}

/// Newest first; every change of the list returns to page 1
pub fn maintenance_config() -> ListConfig {
    ListConfig::new("Mantenimiento", "mantenimientos")
        .with_page_size(25)
        .with_reset_policy(PageResetPolicy::ResetToFirst)
        .with_sort("fecha", false)
}

fn kind_badge(kind: MaintenanceKind) -> AnyView {
    let class = match kind {
        MaintenanceKind::Preventive => "badge badge--success",
        MaintenanceKind::Corrective => "badge badge--warning",
        MaintenanceKind::Predictive => "badge badge--primary",
        MaintenanceKind::Other => "badge badge--neutral",
    };
    view! { <span class=class>{kind.label()}</span> }.into_any()
}

#[component]
pub fn MaintenanceList() -> impl IntoView {
    let handle = ListHandle::mount(MaintenanceApi, maintenance_filters(), maintenance_config());

    let page = Signal::derive(move || handle.read(|c| c.page()));
    let search = Signal::derive(move || handle.read(|c| c.search()));
    let loading = Signal::derive(move || handle.read(|c| c.status().is_loading()));
    let summary = Memo::new(move |_| handle.read(|c| summarize(&c.visible_records())));
    let dialog_key = Memo::new(move |_| {
        handle.read(|c| c.edit_session().map(|s| s.generation))
    });

    let breakdown = move || {
        let parts: Vec<String> = summary
            .get()
            .by_kind
            .iter()
            .map(|k| format!("{}: {} ({})", k.kind.label(), k.count, format_money(k.total_cost)))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" · "))
    };

    let row = move |record: MaintenanceRecord| {
        let id = record.record_id();
        let id_for_delete = id.clone();
        let edit_id = id.clone();
        let busy = Signal::derive(move || handle.read(|c| c.is_in_flight(&id)));
        let mark = move |text: &str| highlight_matches(text, &search.get_untracked());
        view! {
            <TableRow>
                <TableCell>
                    <TableCellLayout>{record.date.format("%d/%m/%Y").to_string()}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>
                        <span style="font-weight: 500;">{mark(&record.bus_code)}</span>
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>{kind_badge(record.kind)}</TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>
                        {mark(record.workshop.as_deref().unwrap_or(""))}
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout truncate=true>
                        {mark(record.description.as_deref().unwrap_or(""))}
                    </TableCellLayout>
                </TableCell>
                <TableCell>
                    <TableCellLayout>
                        <span style="font-variant-numeric: tabular-nums;">{format_money(record.cost)}</span>
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
                    <h1 class="page__title">"Mantenimiento"</h1>
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

                <div class="stat-cards">
                    <StatCard
                        label="Intervenciones"
                        icon_name="maintenance"
                        value=Signal::derive(move || Some(summary.get().count as f64))
                        format=ValueFormat::Integer
                        subtitle=Signal::derive(breakdown)
                    />
                    <StatCard
                        label="Costo total"
                        icon_name="maintenance"
                        value=Signal::derive(move || Some(summary.get().total_cost))
                        format=ValueFormat::Money
                    />
                    <StatCard
                        label="Costo promedio"
                        icon_name="maintenance"
                        value=Signal::derive(move || summary.get().average_cost)
                        format=ValueFormat::Money
                    />
                    <StatCard
                        label="Unidades atendidas"
                        icon_name="bus"
                        value=Signal::derive(move || Some(summary.get().units as f64))
                        format=ValueFormat::Integer
                    />
                </div>

                <ListFilterBar handle=handle search_placeholder="Unidad, taller o descripción..." />

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <SortableHeader handle=handle field="fecha" label="Fecha" min_width=100.0 />
                                <SortableHeader handle=handle field="unidad" label="Unidad" min_width=100.0 />
                                <SortableHeader handle=handle field="tipo" label="Tipo" />
                                <SortableHeader handle=handle field="taller" label="Taller" min_width=140.0 />
                                <TableHeaderCell min_width=200.0>"Descripción"</TableHeaderCell>
                                <SortableHeader handle=handle field="costo" label="Costo" min_width=110.0 />
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
                        .map(|session| view! { <MaintenanceDialog handle=handle session=session /> })
                }}
            </div>
        </div>
    }
}
