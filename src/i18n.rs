/// Interface strings (en, fr)
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

use crate::models::{Priority, StatsKind, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "fr" | "french" | "français" => Ok(Self::Fr),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Look up an interface string. Unknown keys come back unchanged.
pub fn t(lang: Language, key: &'static str) -> &'static str {
    let pair = match key {
        // statuses / priorities
        "todo" => ("To do", "À faire"),
        "in_progress" => ("In progress", "En cours"),
        "completed" => ("Completed", "Terminée"),
        "closed" => ("Closed", "Fermée"),
        "low" => ("Low", "Basse"),
        "medium" => ("Medium", "Moyenne"),
        "high" => ("High", "Haute"),
        "unassigned" => ("Unassigned", "Non assignée"),
        "before_deadline" => ("Before deadline", "Avant l'échéance"),
        "after_deadline" => ("After deadline", "Après l'échéance"),

        // views
        "login" => ("Sign in", "Connexion"),
        "signup" => ("Sign up", "Inscription"),
        "verify" => ("Verify account", "Vérifier le compte"),
        "forgot_password" => ("Forgot password", "Mot de passe oublié"),
        "reset_password" => ("Reset password", "Réinitialiser le mot de passe"),
        "admin_dashboard" => ("Admin dashboard", "Tableau de bord admin"),
        "employee_dashboard" => ("Dashboard", "Tableau de bord"),
        "task_board" => ("Task board", "Tableau des tâches"),
        "tasks" => ("Tasks", "Tâches"),
        "my_tasks" => ("My tasks", "Mes tâches"),
        "task_details" => ("Task details", "Détails de la tâche"),
        "create_task" => ("Create task", "Créer une tâche"),
        "employees" => ("Employees", "Employés"),
        "add_employee" => ("Add employee", "Ajouter un employé"),
        "employee_profile" => ("Employee profile", "Profil de l'employé"),
        "profile" => ("Profile", "Profil"),
        "stats" => ("Statistics", "Statistiques"),
        "unauthorized" => ("Unauthorized", "Accès refusé"),
        "unauthorized_message" => (
            "You do not have permission to view this page.",
            "Vous n'avez pas la permission d'accéder à cette page.",
        ),
        "loading" => ("Loading...", "Chargement..."),
        "no_data" => ("No data available", "Aucune donnée disponible"),
        "no_tasks" => ("You don't have any tasks yet.", "Vous n'avez encore aucune tâche."),
        "no_employees" => ("No employees found.", "Aucun employé trouvé."),

        // fields
        "email" => ("Email", "Email"),
        "password" => ("Password", "Mot de passe"),
        "confirm_password" => ("Confirm password", "Confirmer le mot de passe"),
        "current_password" => ("Current password", "Mot de passe actuel"),
        "new_password" => ("New password", "Nouveau mot de passe"),
        "username" => ("Username", "Nom d'utilisateur"),
        "first_name" => ("First name", "Prénom"),
        "last_name" => ("Last name", "Nom"),
        "full_name" => ("Name", "Nom complet"),
        "role" => ("Role", "Rôle"),
        "verification_code" => ("Verification code", "Code de vérification"),
        "reset_token" => ("Reset token", "Jeton de réinitialisation"),
        "title" => ("Title", "Titre"),
        "description" => ("Description", "Description"),
        "deadline" => ("Deadline", "Échéance"),
        "estimated_duration" => ("Estimated duration (h)", "Durée estimée (h)"),
        "actual_duration" => ("Actual duration (h)", "Durée réelle (h)"),
        "priority" => ("Priority", "Priorité"),
        "status" => ("Status", "Statut"),
        "assigned_employee" => ("Assigned employee", "Employé assigné"),
        "total_tasks" => ("Total", "Total"),

        // list
        "search" => ("Search title or employee", "Rechercher titre ou employé"),
        "all_statuses" => ("All statuses", "Tous les statuts"),
        "all_priorities" => ("All priorities", "Toutes les priorités"),
        "page" => ("Page", "Page"),

        // stats
        "stats_by_status" => ("Tasks by status", "Tâches par statut"),
        "stats_by_priority" => ("Tasks by priority", "Tâches par priorité"),
        "stats_by_day" => ("Tasks by day", "Tâches par jour"),
        "stats_by_week" => ("Tasks by week", "Tâches par semaine"),
        "stats_by_month" => ("Tasks by month", "Tâches par mois"),
        "stats_deadline" => (
            "Completed before vs after deadline",
            "Terminées avant / après l'échéance",
        ),

        // notifications
        "login_failed" => ("Login failed", "Échec de la connexion"),
        "signup_done" => (
            "Account created, check your email for the code",
            "Compte créé, vérifiez votre email",
        ),
        "verify_done" => ("Account verified, you can sign in", "Compte vérifié, connectez-vous"),
        "task_created" => ("Task created", "Tâche créée"),
        "task_updated" => ("Task updated", "Tâche mise à jour"),
        "task_deleted" => ("Task deleted", "Tâche supprimée"),
        "employee_added" => ("Employee added", "Employé ajouté"),
        "profile_saved" => ("Profile saved", "Profil enregistré"),
        "password_changed" => ("Password changed", "Mot de passe modifié"),
        "move_reverted" => ("Move failed, task restored", "Échec du déplacement, tâche restaurée"),
        "move_failed" => ("Move failed", "Échec du déplacement"),
        "not_assignee" => (
            "Only the assigned employee can move this task",
            "Seul l'employé assigné peut déplacer cette tâche",
        ),
        "confirm_delete" => ("Delete this task?", "Supprimer cette tâche ?"),
        "logged_out" => ("Signed out", "Déconnecté"),

        _ => return key,
    };

    match lang {
        Language::En => pair.0,
        Language::Fr => pair.1,
    }
}

/// Localised label for a raw stats category key.
///
/// Status, priority and deadline keys are translated, dates and week numbers
/// are shown as the backend sends them.
pub fn category_label(lang: Language, kind: StatsKind, key: &str) -> Cow<'static, str> {
    let translated = match kind {
        StatsKind::ByStatus => key.parse::<TaskStatus>().ok().map(|s| t(lang, s.label_key())),
        StatsKind::ByPriority => key.parse::<Priority>().ok().map(|p| t(lang, p.label_key())),
        StatsKind::DeadlineOutcome => match key {
            "BeforeDeadline" => Some(t(lang, "before_deadline")),
            "AfterDeadline" => Some(t(lang, "after_deadline")),
            _ => None,
        },
        StatsKind::ByDay | StatsKind::ByWeek | StatsKind::ByMonth => None,
    };

    match translated {
        Some(label) => Cow::Borrowed(label),
        None => Cow::Owned(key.to_string()),
    }
}
