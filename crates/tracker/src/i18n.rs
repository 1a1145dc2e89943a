use std::sync::atomic::{AtomicU8, Ordering};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    #[default]
    En,
    Et,
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "et" => Ok(Lang::Et),
            other => Err(format!("unknown language '{other}' (expected en or et)")),
        }
    }
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::Et,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::En => 0,
            Lang::Et => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    t_in(lang(), key)
}

/// Translate a key to the given language.
pub fn t_in(l: Lang, key: &str) -> &'static str {
    let et = l == Lang::Et;
    match key {
        // ── Install methods ─────────────────────────────────
        "method.crane" => if et { "Kraana" } else { "Crane" },
        "method.lift" => if et { "Upitaja" } else { "Lift" },
        "method.manual" => if et { "Käsitsi" } else { "Manual" },

        // ── Audit log ───────────────────────────────────────
        "log.installed" => if et { "Paigaldatud" } else { "Installed" },
        "log.delivered" => if et { "Tarnitud" } else { "Delivered" },
        "log.bolted" => if et { "Poldid pingutatud" } else { "Bolts tightened" },
        "log.edited_installation" => if et { "Muudeti paigaldusandmeid" } else { "Installation data edited" },
        "log.edited_delivery" => if et { "Muudeti tarneandmeid" } else { "Delivery data edited" },
        "log.edited_bolting" => if et { "Muudeti poltide andmeid" } else { "Bolting data edited" },
        "log.removed_installation" => if et { "Eemaldati paigaldusest" } else { "Removed from installation" },
        "log.removed_delivery" => if et { "Eemaldati tarnest" } else { "Removed from delivery" },
        "log.removed_bolting" => if et { "Eemaldati poltide nimekirjast" } else { "Removed from bolting" },

        // ── History ─────────────────────────────────────────
        "history.unassigned_vehicle" => if et { "Määramata" } else { "Unassigned" },

        // ── Form errors ─────────────────────────────────────
        "error.missing_installers" => if et { "Vali vähemalt üks paigaldaja." } else { "Select at least one installer." },
        "error.missing_custom_method" => if et { "Palun täpsusta muu paigaldusviis." } else { "Please describe the other installation method." },
        "error.unloading_before_arrival" => if et { "Mahalaadimise lõpp ei tohi olla enne saabumist." } else { "Unloading cannot end before arrival." },
        "error.missing_bolt_installer" => if et { "Vali pingutaja nimi." } else { "Choose the bolt installer." },
        "error.empty_selection" => if et { "Ühtegi detaili pole valitud." } else { "No parts selected." },
        "error.read_only" => if et { "Statistika vaates ei saa andmeid salvestada." } else { "Statistics view is read-only." },
        "error.blocked_on" => if et { "See vaade nõuab, et Assembly Selection oleks sees." } else { "This mode requires Assembly Selection to be ON." },
        "error.blocked_off" => if et { "See vaade nõuab, et Assembly Selection oleks väljas." } else { "This mode requires Assembly Selection to be OFF." },
        "error.not_acknowledged" => if et { "Kinnita üle kirjutamine." } else { "Confirm the overwrite first." },
        "error.no_pending_overwrite" => if et { "Ülekirjutamist ei oota ükski salvestus." } else { "There is no overwrite waiting for confirmation." },
        "error.kind_mismatch" => if et { "Andmete tüüp ei sobi grupiga." } else { "The data does not match this group." },
        "error.no_group_edit" => if et { "Ühtegi gruppi ei muudeta." } else { "No group is being edited." },
        "error.not_in_group" => if et { "Detail ei kuulu gruppi." } else { "The part is not a member of this group." },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MONTHS_ET: [&str; 12] = [
    "Jaanuar", "Veebruar", "Märts", "Aprill", "Mai", "Juuni",
    "Juuli", "August", "September", "Oktoober", "November", "Detsember",
];

/// Month name for a 1-based month number
pub fn month_name(l: Lang, month: u32) -> &'static str {
    let idx = (month.clamp(1, 12) - 1) as usize;
    match l {
        Lang::En => MONTHS_EN[idx],
        Lang::Et => MONTHS_ET[idx],
    }
}

pub fn weekday_name(l: Lang, day: Weekday) -> &'static str {
    match (l, day) {
        (Lang::En, Weekday::Mon) => "Monday",
        (Lang::En, Weekday::Tue) => "Tuesday",
        (Lang::En, Weekday::Wed) => "Wednesday",
        (Lang::En, Weekday::Thu) => "Thursday",
        (Lang::En, Weekday::Fri) => "Friday",
        (Lang::En, Weekday::Sat) => "Saturday",
        (Lang::En, Weekday::Sun) => "Sunday",
        (Lang::Et, Weekday::Mon) => "esmaspäev",
        (Lang::Et, Weekday::Tue) => "teisipäev",
        (Lang::Et, Weekday::Wed) => "kolmapäev",
        (Lang::Et, Weekday::Thu) => "neljapäev",
        (Lang::Et, Weekday::Fri) => "reede",
        (Lang::Et, Weekday::Sat) => "laupäev",
        (Lang::Et, Weekday::Sun) => "pühapäev",
    }
}
