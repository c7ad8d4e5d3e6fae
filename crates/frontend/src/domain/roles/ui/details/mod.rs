use crate::domain::roles::api::RolesApi;
use crate::shared::components::list_parts::EditDialog;
use crate::shared::form_utils::non_empty;
use crate::shared::list_controller::EditSession;
use crate::shared::list_handle::ListHandle;
use contracts::domain::roles::RoleForm;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn RoleDialog(handle: ListHandle<RolesApi>, session: EditSession<RoleForm>) -> impl IntoView {
    let is_edit = session.is_edit();
    let form = session.form;
    let name = RwSignal::new(form.name.clone());
    let description = RwSignal::new(form.description.clone().unwrap_or_default());
    let active = RwSignal::new(form.active);

    let title = if is_edit {
        format!("Editar rol: {}", form.name)
    } else {
        "Nuevo rol".to_string()
    };

    let error = Signal::derive(move || handle.read(|c| c.edit_session().and_then(|s| s.error)));
    let saving = Signal::derive(move || {
        handle.read(|c| c.edit_session().is_some_and(|s| s.saving))
    });

    let on_save = Callback::new(move |_| {
        handle.controller().update_form(|f| {
            f.name = name.get_untracked().trim().to_string();
            f.description = non_empty(&description.get_untracked());
            f.active = active.get_untracked();
        });
        handle.spawn(|c| async move { c.save().await });
    });
    let on_cancel = Callback::new(move |_| handle.controller().cancel_edit());

    view! {
        <EditDialog title=title error=error saving=saving on_cancel=on_cancel on_save=on_save>
            <div class="form__group">
                <Label>"Nombre"</Label>
                <Input value=name disabled=saving />
            </div>

            <div class="form__group">
                <Label>"Descripción"</Label>
                <Input value=description disabled=saving />
            </div>

            <div class="form__group">
                <Checkbox checked=active label="Activo" />
            </div>
        </EditDialog>
    }
}
