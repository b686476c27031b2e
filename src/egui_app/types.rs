//! Shared types for the egui app: the current screen and the signed-in user.

use serde::{Deserialize, Serialize};

use crate::shared::models::{Role, UserRecord};

/// Current app view/mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    /// Login and password reset
    Login,
    /// Dashboard with the module cards
    Home,
    /// LGPD checklist with the completion toggles
    Checklist,
    /// User registration and administration
    Users,
    /// Document registry
    Documents,
    /// Appointed DPO ("Encarregado")
    Dpo,
    /// Own profile and password change
    Profile,
}

impl AppView {
    pub fn title(&self) -> &'static str {
        match self {
            AppView::Login => "Entrar",
            AppView::Home => "Início",
            AppView::Checklist => "Checklist",
            AppView::Users => "Cadastro de Usuário",
            AppView::Documents => "Documentos",
            AppView::Dpo => "Encarregado",
            AppView::Profile => "Perfil",
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, AppView::Login)
    }
}

/// The signed-in user as far as the client knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub first_name: String,
    pub role: Role,
    pub avatar: Option<String>,
}

impl SessionUser {
    pub fn can_manage(&self) -> bool {
        self.role.can_manage()
    }

    /// `first_name`, else `email`, else `usuário`.
    pub fn greeting_name(&self) -> &str {
        [self.first_name.trim(), self.email.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("usuário")
    }
}

impl From<UserRecord> for SessionUser {
    fn from(value: UserRecord) -> Self {
        Self {
            email: value.email,
            first_name: value.first_name,
            role: value.role,
            avatar: value.avatar,
        }
    }
}
