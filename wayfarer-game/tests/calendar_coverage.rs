use wayfarer_game::{ALL_CYCLES, CalendarError, Cycle, MoonIcon, content};

#[test]
fn bands_partition_the_authored_range() {
    let content = content();
    for cycle in ALL_CYCLES {
        let calendar = content.calendar(cycle);
        let bands = calendar.bands();
        assert_eq!(bands.first().map(|b| b.start), Some(1), "{cycle}");
        assert_eq!(bands.last().map(|b| b.end), Some(calendar.ceiling()), "{cycle}");
        for pair in bands.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start, "{cycle}: bands not contiguous");
        }
        for day in 1..=calendar.ceiling() {
            let covering = bands.iter().filter(|band| band.contains(day)).count();
            assert_eq!(covering, 1, "{cycle}: day {day} covered {covering} times");
            assert!(calendar.weather_for(day).unwrap().contains(day));
        }
    }
}

#[test]
fn extended_days_have_no_special_weather() {
    let calendar = content().calendar(Cycle::Core);
    let past = calendar.ceiling() + 1;
    assert_eq!(
        calendar.weather_for(past),
        Err(CalendarError::DayOutOfRange {
            cycle: Cycle::Core,
            day: past
        })
    );
    assert!(content().weather(Cycle::Core, past).is_none());
}

#[test]
fn expansion_layers_secondary_weather() {
    let band = content()
        .weather(Cycle::LegacyOfTheAncestors, 6)
        .expect("day 6 has weather");
    assert_eq!(band.weather, "downpour");
    assert_eq!(band.secondary.as_deref(), Some("rising_waters"));
    assert!(content().weather(Cycle::Core, 6).unwrap().secondary.is_none());
}

#[test]
fn moon_icons_cover_every_authored_day() {
    let content = content();
    for day in 1..=content.moon().last_day() {
        assert!(content.moon_icon(day).is_some(), "day {day} has no moon icon");
    }
    // Day 14 reuses day 13's icon.
    assert_eq!(content.moon_icon(14), content.moon_icon(13));
    assert_eq!(content.moon_icon(1), Some(MoonIcon::NewMoon));
}

#[test]
fn fixed_guide_entries_are_per_cycle() {
    let content = content();
    assert_eq!(content.fixed_guide_entries(Cycle::Core, 1), ["1".to_string()]);
    assert_eq!(
        content.fixed_guide_entries(Cycle::LegacyOfTheAncestors, 1),
        ["1".to_string(), "LoA.1".to_string()]
    );
    assert!(content.fixed_guide_entries(Cycle::Core, 2).is_empty());
}
