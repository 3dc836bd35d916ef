//! Demo dataset.

use barrelhub_domain::alert_button::AlertButton;
use barrelhub_domain::barrel::{Barrel, BarrelState};
use barrelhub_domain::team::Team;
use barrelhub_domain::user::User;

#[derive(Default)]
pub struct Seed {
    pub teams: Vec<Team>,
    pub users: Vec<User>,
    pub alert_buttons: Vec<AlertButton>,
    pub barrels: Vec<Barrel>,
}

/// A small event: three bar teams, an admin, a few barrels in every state.
pub fn demo() -> Seed {
    let teams = vec![
        Team::new("t1", "Red Bar"),
        Team::new("t2", "Blue Bar"),
        Team::new("t3", "Storage"),
    ];

    let mut admin = User::new("u1", "Admin").with_admin(true);
    admin.can_login_as = true;
    let users = vec![
        admin,
        User::new("u2", "Red barman").with_team("t1"),
        User::new("u3", "Blue barman").with_team("t2"),
    ];

    let alert_buttons = vec![
        AlertButton::new("a1", "Red Bar - need help").with_team("t1"),
        AlertButton::new("a2", "Blue Bar - need help").with_team("t2"),
    ];

    let barrels = vec![
        Barrel::new("b1", 1).with_kind("blonde").with_place("t1"),
        Barrel::new("b2", 2)
            .with_kind("blonde")
            .with_state(BarrelState::Opened)
            .with_place("t1"),
        Barrel::new("b3", 3)
            .with_kind("ipa")
            .with_state(BarrelState::Empty)
            .with_place("t2"),
        Barrel::new("b4", 4).with_kind("ipa"),
    ];

    Seed {
        teams,
        users,
        alert_buttons,
        barrels,
    }
}
