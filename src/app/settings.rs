use leptos::prelude::*;
use models::*;
use reactive_stores::Store;
use shared_constants::SETTINGS_STORAGE_KEY;
use thaw::{
    Card, CardHeader, Flex, FlexGap, Select, Table, TableBody, TableCell, TableRow, Text, TextTag,
};

use super::storage;

#[derive(Clone, Copy, Debug)]
pub struct SettingsInjection(pub Store<Settings>);

impl SettingsInjection {
    #[track_caller]
    pub fn expect_context() -> Store<Settings> {
        expect_context::<Self>().0
    }
}

/// Stored settings, falling back to the defaults when there are none or
/// they cannot be read.
pub fn load_settings() -> Settings {
    let Some(json) = storage::get_string(SETTINGS_STORAGE_KEY) else {
        log::debug!("No stored settings, using defaults");
        return Settings::default();
    };
    Settings::from_json(&json).unwrap_or_else(|err| {
        log::warn!("Stored settings are unreadable, using defaults: {err}");
        Settings::default()
    })
}

fn save_settings(settings: &Settings) {
    match settings.to_json() {
        Ok(json) => storage::set_string(SETTINGS_STORAGE_KEY, &json),
        Err(err) => log::error!("Failed to encode settings: {err}"),
    }
}

pub fn provide_settings() -> Store<Settings> {
    let settings = Store::new(load_settings());
    Effect::watch(
        move || settings.get(),
        move |settings, _, _| save_settings(settings),
        false,
    );
    provide_context(SettingsInjection(settings));
    settings
}

const CUSTOM_PRESET: &str = "custom";

#[component]
fn PresetSelect() -> impl IntoView {
    let settings = SettingsInjection::expect_context();
    let preset_name = move |units: &UnitSelection| {
        units
            .matching_preset()
            .map_or(CUSTOM_PRESET, UnitPreset::as_str)
            .to_string()
    };
    let initial = settings.units().with_untracked(preset_name);
    let selected = RwSignal::new(initial.clone());

    Effect::watch(
        move || settings.units().with(preset_name),
        move |name, _, _| {
            if selected.with_untracked(|selected| selected != name) {
                selected.set(name.clone());
            }
        },
        false,
    );
    Effect::watch(
        move || selected.get(),
        move |name, _, _| {
            let Some(preset) = UnitPreset::from_name(name) else {
                return;
            };
            if settings
                .units()
                .with_untracked(|units| units.matching_preset() != Some(preset))
            {
                log::info!("Applying {preset} units");
                settings.units().update(|units| units.apply_preset(preset));
            }
        },
        false,
    );

    view! {
        <Select default_value=initial value=selected>
            {UnitPreset::ALL
                .into_iter()
                .map(|preset| view! { <option label=preset.to_string() value=preset.as_str() /> })
                .collect::<Vec<_>>()}
            <option label="Custom" value=CUSTOM_PRESET disabled=true />
        </Select>
    }
}

#[component]
fn UnitSelect(kind: QuantityKind) -> impl IntoView {
    let settings = SettingsInjection::expect_context();
    let current = move || settings.units().with(|units| units.unit(kind).symbol());
    let on_change = move |ev: leptos::ev::Event| {
        let symbol = event_target_value(&ev);
        match Unit::from_symbol(&symbol) {
            Ok(unit) => settings.units().update(|units| {
                if let Err(err) = units.set(kind, unit) {
                    log::error!("Rejected unit choice: {err}");
                }
            }),
            Err(err) => log::error!("Rejected unit choice: {err}"),
        }
    };
    view! {
        <select class="unit-select" prop:value=current on:change=on_change>
            {kind
                .units()
                .into_iter()
                .map(|unit| {
                    view! {
                        <option value=unit.symbol() selected=move || current() == unit.symbol()>
                            {format!("{} ({})", unit.name(), unit.symbol())}
                        </option>
                    }
                })
                .collect::<Vec<_>>()}
        </select>
    }
}

#[component]
fn UnitsCard() -> impl IntoView {
    view! {
        <Card class="settings-card">
            <CardHeader>
                <Text tag=TextTag::H3>"Units"</Text>
            </CardHeader>
            <Table>
                <TableBody>
                    <TableRow>
                        <TableCell>
                            <Text tag=TextTag::Em>"Preset"</Text>
                        </TableCell>
                        <TableCell>
                            <PresetSelect />
                        </TableCell>
                    </TableRow>
                    {QuantityKind::ALL
                        .into_iter()
                        .filter(|kind| kind.is_selectable())
                        .map(|kind| {
                            view! {
                                <TableRow>
                                    <TableCell>{kind.label()}</TableCell>
                                    <TableCell>
                                        <UnitSelect kind />
                                    </TableCell>
                                </TableRow>
                            }
                        })
                        .collect::<Vec<_>>()}
                </TableBody>
            </Table>
        </Card>
    }
}

const REFRESH_CHOICES: [(u32, &str); 5] = [
    (30, "Every 30 seconds"),
    (60, "Every minute"),
    (120, "Every 2 minutes"),
    (300, "Every 5 minutes"),
    (900, "Every 15 minutes"),
];

/// Select bound to one display setting through its string name.
fn watch_choice(
    value: RwSignal<String>,
    apply: impl Fn(&mut Settings, &str) + 'static,
) {
    let settings = SettingsInjection::expect_context();
    Effect::watch(
        move || value.get(),
        move |name, _, _| settings.update(|settings| apply(settings, name)),
        false,
    );
}

#[component]
fn DisplayCard() -> impl IntoView {
    let settings = SettingsInjection::expect_context();
    let display = settings.display().get_untracked();

    let locale = RwSignal::new(display.locale.as_str().to_string());
    watch_choice(locale, |settings, name| {
        if let Some(locale) = DisplayLocale::from_tag(name) {
            settings.display.locale = locale;
        }
    });
    let clock = RwSignal::new(
        match display.clock {
            ClockFormat::H12 => "12",
            ClockFormat::H24 => "24",
        }
        .to_string(),
    );
    watch_choice(clock, |settings, name| {
        settings.display.clock = if name == "12" {
            ClockFormat::H12
        } else {
            ClockFormat::H24
        };
    });
    let timezone = RwSignal::new(
        match display.timezone {
            TimeZoneChoice::Local => "local",
            TimeZoneChoice::Utc => "utc",
        }
        .to_string(),
    );
    watch_choice(timezone, |settings, name| {
        settings.display.timezone = if name == "utc" {
            TimeZoneChoice::Utc
        } else {
            TimeZoneChoice::Local
        };
    });

    let refresh = RwSignal::new(settings.refresh_interval_secs().get_untracked().to_string());
    Effect::watch(
        move || refresh.get(),
        move |secs, _, _| match secs.parse::<u32>() {
            Ok(secs) => settings
                .refresh_interval_secs()
                .set(secs.max(MIN_REFRESH_INTERVAL_SECS)),
            Err(err) => log::error!("Invalid refresh interval `{secs}`: {err}"),
        },
        false,
    );

    let default_locale = locale.get_untracked();
    let default_clock = clock.get_untracked();
    let default_timezone = timezone.get_untracked();
    let default_refresh = refresh.get_untracked();
    view! {
        <Card class="settings-card">
            <CardHeader>
                <Text tag=TextTag::H3>"Display"</Text>
            </CardHeader>
            <Table>
                <TableBody>
                    <TableRow>
                        <TableCell>"Language"</TableCell>
                        <TableCell>
                            <Select default_value=default_locale value=locale>
                                {DisplayLocale::ALL
                                    .into_iter()
                                    .map(|locale| {
                                        view! {
                                            <option label=locale.to_string() value=locale.as_str() />
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </Select>
                        </TableCell>
                    </TableRow>
                    <TableRow>
                        <TableCell>"Clock"</TableCell>
                        <TableCell>
                            <Select default_value=default_clock value=clock>
                                <option label="24 hours" value="24" />
                                <option label="12 hours" value="12" />
                            </Select>
                        </TableCell>
                    </TableRow>
                    <TableRow>
                        <TableCell>"Time zone"</TableCell>
                        <TableCell>
                            <Select default_value=default_timezone value=timezone>
                                <option label="Local time" value="local" />
                                <option label="UTC" value="utc" />
                            </Select>
                        </TableCell>
                    </TableRow>
                    <TableRow>
                        <TableCell>"Refresh"</TableCell>
                        <TableCell>
                            <Select default_value=default_refresh value=refresh>
                                {REFRESH_CHOICES
                                    .into_iter()
                                    .map(|(secs, label)| {
                                        view! { <option label=label value=secs.to_string() /> }
                                    })
                                    .collect::<Vec<_>>()}
                            </Select>
                        </TableCell>
                    </TableRow>
                </TableBody>
            </Table>
        </Card>
    }
}

/// Settings page. Every change is applied and stored immediately.
#[component]
pub fn SettingsView() -> impl IntoView {
    view! {
        <Flex vertical=true gap=FlexGap::Medium class="settings-layout">
            <UnitsCard />
            <DisplayCard />
        </Flex>
    }
}
