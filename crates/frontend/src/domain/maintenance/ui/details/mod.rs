use crate::domain::maintenance::api::MaintenanceApi;
use crate::shared::components::list_parts::EditDialog;
use crate::shared::form_utils::{non_empty, parse_date, parse_decimal};
use crate::shared::list_controller::{ApiError, EditSession};
use crate::shared::list_handle::ListHandle;
use contracts::domain::maintenance::{MaintenanceForm, MaintenanceKind};
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn MaintenanceDialog(
    handle: ListHandle<MaintenanceApi>,
    session: EditSession<MaintenanceForm>,
) -> impl IntoView {
    let is_edit = session.is_edit();
    let form = session.form;
    let bus_code = RwSignal::new(form.bus_code.clone());
    let kind = RwSignal::new(form.kind);
    let date = RwSignal::new(
        form.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    );
    let cost = RwSignal::new(form.cost.to_string());
    let workshop = RwSignal::new(form.workshop.clone().unwrap_or_default());
    let description = RwSignal::new(form.description.clone().unwrap_or_default());
    let local_error = RwSignal::new(None::<String>);

    let title = if is_edit {
        format!("Editar mantenimiento: {}", form.bus_code)
    } else {
        "Nuevo mantenimiento".to_string()
    };

    let error = Signal::derive(move || {
        local_error
            .get()
            .or_else(|| handle.read(|c| c.edit_session().and_then(|s| s.error)))
    });
    let saving = Signal::derive(move || {
        handle.read(|c| c.edit_session().is_some_and(|s| s.saving))
    });

    let on_save = Callback::new(move |_| {
        let cost = match parse_decimal(&cost.get_untracked()) {
            Ok(v) => v.unwrap_or(0.0),
            Err(msg) => {
                local_error.set(Some(ApiError::validation(Some("costo"), msg).inline_message()));
                return;
            }
        };
        local_error.set(None);
        handle.controller().update_form(|f| {
            f.bus_code = bus_code.get_untracked().trim().to_uppercase();
            f.kind = kind.get_untracked();
            f.date = parse_date(&date.get_untracked());
            f.cost = cost;
            f.workshop = non_empty(&workshop.get_untracked());
            f.description = non_empty(&description.get_untracked());
        });
        handle.spawn(|c| async move { c.save().await });
    });
    let on_cancel = Callback::new(move |_| handle.controller().cancel_edit());

    let kind_options = MaintenanceKind::ALL
        .into_iter()
        .map(|k| {
            view! {
                <option value=k.as_str() selected=move || kind.get() == k>
                    {k.label()}
                </option>
            }
        })
        .collect_view();

    view! {
        <EditDialog title=title error=error saving=saving on_cancel=on_cancel on_save=on_save>
            <Flex gap=FlexGap::Small>
                <div class="form__group" style="flex: 1;">
                    <Label>"Unidad"</Label>
                    <Input value=bus_code placeholder="BUS-001" disabled=saving />
                </div>
                <div class="form__group" style="flex: 1;">
                    <Label>"Tipo"</Label>
                    <select
                        class="form__select"
                        disabled=move || saving.get()
                        on:change=move |ev| {
                            if let Some(k) = MaintenanceKind::from_str_opt(&event_target_value(&ev)) {
                                kind.set(k);
                            }
                        }
                    >
                        <option value="" disabled=true selected=move || kind.get() == MaintenanceKind::Other>
                            "Seleccione..."
                        </option>
                        {kind_options}
                    </select>
                </div>
            </Flex>

            <Flex gap=FlexGap::Small>
                <div class="form__group" style="flex: 1;">
                    <Label>"Fecha"</Label>
                    <input
                        type="date"
                        class="form__input"
                        disabled=move || saving.get()
                        prop:value=move || date.get()
                        on:change=move |ev| date.set(event_target_value(&ev))
                    />
                </div>
                <div class="form__group" style="flex: 1;">
                    <Label>"Costo"</Label>
                    <Input value=cost input_type=InputType::Number disabled=saving />
                </div>
            </Flex>

            <div class="form__group">
                <Label>"Taller"</Label>
                <Input value=workshop disabled=saving />
            </div>

            <div class="form__group">
                <Label>"Descripción"</Label>
                <Textarea value=description attr:rows=3 />
            </div>
        </EditDialog>
    }
}
