//! Dashboard: module cards and the greeting.

use crate::egui_app::types::{AppView, SessionUser};

pub const HEADLINE: &str = "Gestão de Documentos LGPD";

/// One card on the dashboard. Cards without a target are shown disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeCard {
    pub title: &'static str,
    pub target: Option<AppView>,
}

impl HomeCard {
    const fn new(title: &'static str, target: Option<AppView>) -> Self {
        Self { title, target }
    }

    pub fn enabled(&self) -> bool {
        self.target.is_some()
    }
}

pub const CARDS: [HomeCard; 9] = [
    HomeCard::new("Encarregado", Some(AppView::Dpo)),
    HomeCard::new("Monitoramento", None),
    HomeCard::new("Checklist", Some(AppView::Checklist)),
    HomeCard::new("Documentos", Some(AppView::Documents)),
    HomeCard::new("Dashboards", None),
    HomeCard::new("Inventário de Dados", None),
    HomeCard::new("Matriz de Risco", None),
    HomeCard::new("Relatórios", None),
    HomeCard::new("Notificação", None),
];

#[derive(Debug, Default)]
pub struct HomeScreen;

impl HomeScreen {
    pub fn cards(&self) -> &'static [HomeCard] {
        &CARDS
    }

    pub fn greeting(&self, user: Option<&SessionUser>) -> String {
        let name = user.map(SessionUser::greeting_name).unwrap_or("usuário");
        format!("Olá, {}!", name)
    }
}
