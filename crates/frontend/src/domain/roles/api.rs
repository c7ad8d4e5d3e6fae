use crate::shared::api_utils::{self, api_url, record_url};
use crate::shared::list_controller::{
    ApiError, CrudBackend, ListBackend, ListRecord, QueryParams,
};
use crate::shared::list_utils::{compare_ci, contains_ci, Searchable, Sortable};
use async_trait::async_trait;
use contracts::domain::common::RecordId;
use contracts::domain::roles::{Role, RoleForm};
use std::cmp::Ordering;

const ROLES_PATH: &str = "/api/roles";
const NAME_MAX_LEN: usize = 60;

impl Searchable for Role {
    fn matches_filter(&self, needle: &str) -> bool {
        contains_ci(&self.name, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, needle))
    }
}

impl Sortable for Role {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "nombre" => compare_ci(&self.name, &other.name),
            "activo" => self.active.cmp(&other.active),
            _ => self.id.cmp(&other.id),
        }
    }
}

impl ListRecord for Role {
    type Form = RoleForm;

    fn record_id(&self) -> RecordId {
        RecordId::Int(self.id)
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn to_form(&self) -> RoleForm {
        RoleForm::from(self)
    }
}

/// Checks done before the form goes to the backend
pub fn validate(form: &RoleForm) -> Result<(), ApiError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(Some("nombre"), "es obligatorio"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ApiError::validation(
            Some("nombre"),
            format!("máximo {} caracteres", NAME_MAX_LEN),
        ));
    }
    Ok(())
}

/// REST collaborator for `/api/roles`
pub struct RolesApi;

#[async_trait(?Send)]
impl ListBackend for RolesApi {
    type Record = Role;

    async fn list(&self, params: &QueryParams) -> Result<Option<Vec<Role>>, ApiError> {
        api_utils::fetch_list(ROLES_PATH, params).await
    }
}

#[async_trait(?Send)]
impl CrudBackend for RolesApi {
    async fn create(&self, form: &RoleForm) -> Result<Role, ApiError> {
        validate(form)?;
        api_utils::post_json(&api_url(ROLES_PATH), form).await
    }

    async fn update(&self, id: &RecordId, form: &RoleForm) -> Result<Role, ApiError> {
        validate(form)?;
        api_utils::put_json(&record_url(ROLES_PATH, id), form).await
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        api_utils::delete(&record_url(ROLES_PATH, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_utils::{filter_list, sort_list};

    fn role(id: i64, name: &str, description: Option<&str>) -> Role {
        Role {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            active: true,
        }
    }

    #[test]
    fn test_search_covers_description() {
        let roles = vec![
            role(1, "Administrador", None),
            role(2, "Mecánico", Some("Taller central")),
            role(3, "Chofer", Some("Conduce unidades")),
        ];
        let found = filter_list(roles.clone(), "TALLER");
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(filter_list(roles, "mecá").len(), 1);
    }

    #[test]
    fn test_sort_by_name() {
        let mut roles = vec![role(1, "chofer", None), role(2, "Administrador", None)];
        sort_list(&mut roles, "nombre", true);
        assert_eq!(roles[0].id, 2);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate(&RoleForm {
            name: "Mecánico".into(),
            ..RoleForm::default()
        })
        .is_ok());

        let err = validate(&RoleForm::default()).unwrap_err();
        assert_eq!(err.field(), Some("nombre"));

        let long = RoleForm {
            name: "x".repeat(61),
            ..RoleForm::default()
        };
        assert!(validate(&long).is_err());
    }
}
