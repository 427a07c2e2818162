//! Grade-based recommended weeks and the default visible hours per grade.
//!
//! Each template is a list of blocks over inclusive mark ranges. A block
//! names what happens on weekdays and on the weekend; the first block that
//! covers a mark wins.

use shared::{ActivityType, GradeLevel};

use crate::domain::grid::{is_weekend, GridCell, TimeMark, DAYS_PER_WEEK};
use crate::domain::models::slot::Slot;

/// Default (start, end) of the visible grid for a grade
pub fn grade_default_range(grade: GradeLevel) -> (&'static str, &'static str) {
    match grade {
        GradeLevel::Elementary => ("07:00", "22:00"),
        GradeLevel::Middle => ("07:00", "23:00"),
        GradeLevel::High => ("06:00", "02:00"),
    }
}

type Entry = (&'static str, ActivityType);

struct Block {
    from: &'static str,
    to: &'static str,
    weekday: Entry,
    weekend: Entry,
}

const fn every(from: &'static str, to: &'static str, activity: &'static str, activity_type: ActivityType) -> Block {
    Block {
        from,
        to,
        weekday: (activity, activity_type),
        weekend: (activity, activity_type),
    }
}

const fn split(from: &'static str, to: &'static str, weekday: Entry, weekend: Entry) -> Block {
    Block { from, to, weekday, weekend }
}

use ActivityType::{Academy, Rest, Routine, School, Sleep, Study};

const ELEMENTARY: &[Block] = &[
    every("06:00", "06:30", "Sleep", Sleep),
    every("07:00", "07:00", "Wake up", Routine),
    every("07:30", "07:30", "Get ready", Routine),
    every("08:00", "08:00", "Make the bed", Routine),
    every("08:30", "08:30", "Breakfast", Routine),
    split("09:00", "09:30", ("Morning reading", Study), ("Free reading", Study)),
    split("10:00", "10:30", ("Math practice", Study), ("Free time / TV", Rest)),
    split("11:00", "11:30", ("English listening", Study), ("Free time / TV", Rest)),
    every("12:00", "12:30", "Lunch", Routine),
    split("13:00", "13:30", ("Homework / journal", School), ("Family outing", Rest)),
    split("14:00", "14:30", ("Creative play", Rest), ("Family outing", Rest)),
    split("15:00", "15:30", ("Piano / art class", Academy), ("Playground", Rest)),
    split("16:00", "16:30", ("Taekwondo / jump rope", Academy), ("Playground", Rest)),
    every("17:00", "17:00", "Shower & rest", Routine),
    every("17:30", "17:30", "Free time", Rest),
    every("18:00", "18:30", "Dinner", Routine),
    split("19:00", "19:30", ("Board games / TV", Rest), ("Family movie", Rest)),
    every("20:00", "20:00", "Pack for tomorrow", Routine),
    every("20:30", "20:30", "Brush teeth", Routine),
    every("21:00", "21:00", "Bedtime reading", Rest),
    every("21:30", "02:00", "Sleep", Sleep),
];

const MIDDLE: &[Block] = &[
    every("06:00", "07:00", "Sleep", Sleep),
    every("07:30", "07:30", "Wake up & stretch", Routine),
    every("08:00", "08:00", "Breakfast", Routine),
    every("08:30", "08:30", "Get ready to study", Routine),
    split("09:00", "09:30", ("Math (advanced)", Study), ("Catch up on sleep", Rest)),
    split("10:00", "10:30", ("English vocabulary", Study), ("Free time", Rest)),
    split("11:00", "11:30", ("Online lecture review", Study), ("Free time", Rest)),
    every("12:00", "12:30", "Lunch", Routine),
    split("13:00", "13:30", ("Reading / assignments", School), ("Hobbies / friends", Rest)),
    split("14:00", "14:30", ("Science & social studies", Study), ("Hobbies / friends", Rest)),
    split("15:00", "17:30", ("Academy (English / math)", Academy), ("Free time / games", Rest)),
    every("18:00", "18:30", "Dinner", Routine),
    split("19:00", "20:30", ("Academy homework", Study), ("Family time", Rest)),
    every("21:00", "21:30", "Phone / games", Rest),
    every("22:00", "22:00", "Daily planner", Study),
    every("22:30", "22:30", "Shower & get ready for bed", Routine),
    every("23:00", "02:00", "Sleep", Sleep),
];

const HIGH: &[Block] = &[
    every("06:00", "06:00", "Sleep", Sleep),
    every("06:30", "06:30", "Wake up & stretch", Routine),
    every("07:00", "07:00", "Breakfast", Routine),
    every("07:30", "07:30", "Vocabulary on the way", Study),
    every("08:00", "08:30", "Morning self-study", School),
    split("09:00", "10:30", ("Classes", School), ("Catch up on sleep", Rest)),
    split("11:00", "11:30", ("Classes", School), ("Weak subjects", Study)),
    every("12:00", "12:30", "Lunch & walk", Routine),
    split("13:00", "14:30", ("Classes", School), ("Academy / online lecture", Academy)),
    split("15:00", "16:30", ("Classes", School), ("Self-study", Study)),
    split("17:00", "17:30", ("Break", Routine), ("Self-study", Study)),
    every("18:00", "18:30", "Dinner", Routine),
    split("19:00", "21:30", ("Evening self-study", Study), ("Free time", Rest)),
    every("22:00", "01:30", "Late-night study", Study),
    every("02:00", "02:00", "Sleep", Sleep),
];

fn blocks_for(grade: GradeLevel) -> &'static [Block] {
    match grade {
        GradeLevel::Elementary => ELEMENTARY,
        GradeLevel::Middle => MIDDLE,
        GradeLevel::High => HIGH,
    }
}

fn block_at(blocks: &'static [Block], mark: TimeMark) -> Option<&'static Block> {
    blocks.iter().find(|block| {
        match (TimeMark::parse(block.from), TimeMark::parse(block.to)) {
            (Some(from), Some(to)) => from <= mark && mark <= to,
            _ => false,
        }
    })
}

/// A full week of fresh pending slots for the grade
pub fn recommended_schedule(grade: GradeLevel) -> Vec<Slot> {
    let blocks = blocks_for(grade);
    let mut slots = Vec::new();
    for day in 0..DAYS_PER_WEEK {
        for mark in TimeMark::all() {
            let Some(block) = block_at(blocks, mark) else {
                continue;
            };
            let (activity, activity_type) = if is_weekend(day) {
                block.weekend
            } else {
                block.weekday
            };
            slots.push(Slot::new(GridCell { day, time: mark }, activity, activity_type));
        }
    }
    slots
}
