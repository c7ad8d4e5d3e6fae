use crate::domain::bus_routes::ui::list::BusRoutesList;
use crate::domain::emergency::ui::list::EmergencyList;
use crate::domain::maintenance::ui::list::MaintenanceList;
use crate::domain::roles::ui::list::RolesList;
use crate::shared::icons::icon;
use crate::shared::toasts::{ToastService, ToastStack};
use leptos::prelude::*;

/// Top-level sections of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Roles,
    Routes,
    Maintenance,
    Emergency,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Roles,
        Section::Routes,
        Section::Maintenance,
        Section::Emergency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Roles => "Roles",
            Section::Routes => "Rutas",
            Section::Maintenance => "Mantenimiento",
            Section::Emergency => "Emergencias",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Section::Roles => "roles",
            Section::Routes => "routes",
            Section::Maintenance => "maintenance",
            Section::Emergency => "siren",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Toasts are shared by every list page
    provide_context(ToastService::new());

    let active = RwSignal::new(Section::Roles);

    view! {
        <div class="app-layout">
            <aside class="app-sidebar">
                <div class="app-sidebar__brand">
                    {icon("bus")}
                    <span>"Flota"</span>
                </div>
                <div class="app-sidebar__content">
                    {Section::ALL
                        .into_iter()
                        .map(|section| {
                            view! {
                                <div
                                    class="app-sidebar__item"
                                    class:app-sidebar__item--active=move || active.get() == section
                                    on:click=move |_| active.set(section)
                                >
                                    <div class="app-sidebar__item-content">
                                        {icon(section.icon())}
                                        <span>{section.label()}</span>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </aside>

            <main class="app-main">
                {move || match active.get() {
                    Section::Roles => view! { <RolesList /> }.into_any(),
                    Section::Routes => view! { <BusRoutesList /> }.into_any(),
                    Section::Maintenance => view! { <MaintenanceList /> }.into_any(),
                    Section::Emergency => view! { <EmergencyList /> }.into_any(),
                }}
            </main>

            <ToastStack />
        </div>
    }
}
