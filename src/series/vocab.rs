use crate::error::TrackerError;
use crate::record::types::SkillRecord;
use std::fmt;
use std::str::FromStr;

/// Skills ranked on the hiscores, in the order the hiscores report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Skill {
    Overall,
    Attack,
    Defence,
    Strength,
    Hitpoints,
    Ranged,
    Prayer,
    Magic,
    Cooking,
    Woodcutting,
    Fletching,
    Fishing,
    Firemaking,
    Crafting,
    Smithing,
    Mining,
    Herblore,
    Agility,
    Thieving,
    Slayer,
    Farming,
    Runecrafting,
    Hunter,
    Construction,
}

impl Skill {
    pub const ALL: [Skill; 24] = [
        Skill::Overall,
        Skill::Attack,
        Skill::Defence,
        Skill::Strength,
        Skill::Hitpoints,
        Skill::Ranged,
        Skill::Prayer,
        Skill::Magic,
        Skill::Cooking,
        Skill::Woodcutting,
        Skill::Fletching,
        Skill::Fishing,
        Skill::Firemaking,
        Skill::Crafting,
        Skill::Smithing,
        Skill::Mining,
        Skill::Herblore,
        Skill::Agility,
        Skill::Thieving,
        Skill::Slayer,
        Skill::Farming,
        Skill::Runecrafting,
        Skill::Hunter,
        Skill::Construction,
    ];

    /// Key used for this skill inside a record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Overall => "overall",
            Skill::Attack => "attack",
            Skill::Defence => "defence",
            Skill::Strength => "strength",
            Skill::Hitpoints => "hitpoints",
            Skill::Ranged => "ranged",
            Skill::Prayer => "prayer",
            Skill::Magic => "magic",
            Skill::Cooking => "cooking",
            Skill::Woodcutting => "woodcutting",
            Skill::Fletching => "fletching",
            Skill::Fishing => "fishing",
            Skill::Firemaking => "firemaking",
            Skill::Crafting => "crafting",
            Skill::Smithing => "smithing",
            Skill::Mining => "mining",
            Skill::Herblore => "herblore",
            Skill::Agility => "agility",
            Skill::Thieving => "thieving",
            Skill::Slayer => "slayer",
            Skill::Farming => "farming",
            Skill::Runecrafting => "runecrafting",
            Skill::Hunter => "hunter",
            Skill::Construction => "construction",
        }
    }

    /// Other keys older records may use for the same skill.
    pub fn legacy_keys(&self) -> &'static [&'static str] {
        match self {
            Skill::Overall => &["total"],
            Skill::Runecrafting => &["runecraft"],
            _ => &[],
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if key == "hp" {
            return Ok(Skill::Hitpoints);
        }
        Skill::ALL
            .iter()
            .copied()
            .find(|skill| skill.as_str() == key || skill.legacy_keys().contains(&key.as_str()))
            .ok_or_else(|| TrackerError::UnknownMetric(s.to_string()))
    }
}

/// Which number of a skill a series follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Experience,
    Level,
    Rank,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Experience => "experience",
            Mode::Level => "level",
            Mode::Rank => "rank",
        }
    }

    pub fn select(&self, record: &SkillRecord) -> Option<i64> {
        match self {
            Mode::Experience => record.experience,
            Mode::Level => record.level,
            Mode::Rank => record.rank,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "experience" | "xp" | "exp" => Ok(Mode::Experience),
            "level" => Ok(Mode::Level),
            "rank" => Ok(Mode::Rank),
            _ => Err(TrackerError::UnknownMode(s.to_string())),
        }
    }
}
