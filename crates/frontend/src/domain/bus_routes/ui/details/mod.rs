use crate::domain::bus_routes::api::BusRoutesApi;
use crate::shared::components::list_parts::EditDialog;
use crate::shared::form_utils::{format_optional_f64, parse_decimal};
use crate::shared::list_controller::{ApiError, EditSession};
use crate::shared::list_handle::ListHandle;
use contracts::domain::bus_routes::BusRouteForm;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn BusRouteDialog(
    handle: ListHandle<BusRoutesApi>,
    session: EditSession<BusRouteForm>,
) -> impl IntoView {
    let is_edit = session.is_edit();
    let form = session.form;
    let code = RwSignal::new(form.code.clone());
    let name = RwSignal::new(form.name.clone());
    let origin = RwSignal::new(form.origin.clone());
    let destination = RwSignal::new(form.destination.clone());
    let distance = RwSignal::new(format_optional_f64(form.distance_km));
    let active = RwSignal::new(form.active);
    let local_error = RwSignal::new(None::<String>);

    let title = if is_edit {
        format!("Editar ruta: {} {}", form.code, form.name)
    } else {
        "Nueva ruta".to_string()
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
        let distance_km = match parse_decimal(&distance.get_untracked()) {
            Ok(v) => v,
            Err(msg) => {
                local_error.set(Some(
                    ApiError::validation(Some("distancia_km"), msg).inline_message(),
                ));
                return;
            }
        };
        local_error.set(None);
        handle.controller().update_form(|f| {
            f.code = code.get_untracked().trim().to_uppercase();
            f.name = name.get_untracked().trim().to_string();
            f.origin = origin.get_untracked().trim().to_string();
            f.destination = destination.get_untracked().trim().to_string();
            f.distance_km = distance_km;
            f.active = active.get_untracked();
        });
        handle.spawn(|c| async move { c.save().await });
    });
    let on_cancel = Callback::new(move |_| handle.controller().cancel_edit());

    view! {
        <EditDialog title=title error=error saving=saving on_cancel=on_cancel on_save=on_save>
            <div class="form__group">
                <Label>"Código"</Label>
                <Input value=code placeholder="AB-12" disabled=saving />
            </div>

            <div class="form__group">
                <Label>"Nombre"</Label>
                <Input value=name disabled=saving />
            </div>

            <Flex gap=FlexGap::Small>
                <div class="form__group" style="flex: 1;">
                    <Label>"Origen"</Label>
                    <Input value=origin disabled=saving />
                </div>
                <div class="form__group" style="flex: 1;">
                    <Label>"Destino"</Label>
                    <Input value=destination disabled=saving />
                </div>
            </Flex>

            <div class="form__group">
                <Label>"Distancia (km)"</Label>
                <Input value=distance input_type=InputType::Number disabled=saving />
            </div>

            <div class="form__group">
                <Checkbox checked=active label="Activa" />
            </div>
        </EditDialog>
    }
}
