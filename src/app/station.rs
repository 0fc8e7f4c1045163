use chrono::{DateTime, Utc};
use leptos::{prelude::*, task::spawn_local};
use models::*;
use shared_constants::STATION_STALE_AFTER;
use thaw::{
    Badge, BadgeAppearance, BadgeColor, Flex, FlexAlign, FlexGap, FlexJustify, Grid, GridItem,
    Layout, Spinner, Text, TextTag,
};

use super::{
    fetch::{render_load_state, Backend, LoadError, LoadState},
    settings::SettingsInjection,
    stations::ticking_clock,
    widgets::MetricCard,
};

#[derive(Clone, Debug)]
pub struct UiConfigInjection(pub StoredValue<UiConfigManager>);

impl UiConfigInjection {
    #[track_caller]
    pub fn expect_context() -> StoredValue<UiConfigManager> {
        expect_context::<Self>().0
    }
}

/// Starts loading one station, the returned state fills in when done.
pub fn load_station(backend: Backend, station_id: String) -> RwSignal<LoadState<StationData>> {
    let target = RwSignal::new(LoadState::Loading);
    spawn_local(backend.load_into(target, move |client, session| async move {
        client.station(&session, &station_id).await
    }));
    target
}

/// Summary of min, max and sample count for aggregated readings.
pub fn aggregate_details(reader: &MetricReader, metric: &Metric) -> Option<String> {
    let (min, max) = metric.min.zip(metric.max)?;
    Some(format!(
        "min {} · max {} · {} samples",
        reader.format_value(min, metric.unit, metric.precision),
        reader.format_value(max, metric.unit, metric.precision),
        metric.count
    ))
}

fn metric_cards(
    station: &StationData,
    readings: &[ReadingData],
    settings: &Settings,
    ui: &UiConfigManager,
    now: DateTime<Utc>,
) -> Vec<AnyView> {
    let reader = MetricReader::new(&settings.units, &settings.display, ui);
    station
        .latest_readings(readings)
        .into_iter()
        .filter_map(|(sensor, reading)| match reader.read(sensor, reading) {
            Ok(metric) => Some(metric),
            Err(err) => {
                log::error!("Skipping reading of sensor {}: {err}", sensor.id);
                None
            }
        })
        .map(|metric| {
            let href = Route::Sensor {
                station_id: station.id.clone(),
                sensor_id: metric.sensor_id.clone(),
            }
            .to_hash();
            let details = aggregate_details(&reader, &metric);
            let updated = format_relative(&metric.timestamp, &now);
            view! {
                <GridItem>
                    <MetricCard metric href details updated />
                </GridItem>
            }
            .into_any()
        })
        .collect()
}

#[component]
fn StationHeader(
    station: StationData,
    last_seen: Signal<Option<DateTime<Utc>>>,
    now: ReadSignal<DateTime<Utc>>,
) -> impl IntoView {
    let stale = move || is_stale(last_seen.get(), now.get(), STATION_STALE_AFTER);
    let subtitle = [Some(station.model.clone()), station.location.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");
    view! {
        <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
            <Flex vertical=true>
                <Text tag=TextTag::H2>{station.display_name()}</Text>
                <Text>{subtitle}</Text>
            </Flex>
            <Show when=stale>
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Danger>
                    {move || match last_seen.get() {
                        Some(ts) => format!("Last reading {}", format_relative(&ts, &now.get())),
                        None => "No readings yet".to_string(),
                    }}
                </Badge>
            </Show>
        </Flex>
    }
}

/// Current readings of one station, refreshed on the configured interval.
#[component]
pub fn StationView(station_id: String) -> impl IntoView {
    let backend = Backend::expect_context();
    let settings = SettingsInjection::expect_context();
    let ui = UiConfigInjection::expect_context();
    let station = load_station(backend, station_id);
    let latest = RwSignal::new(LoadState::<Vec<ReadingData>>::Loading);
    let now = ticking_clock();

    let poll = Trigger::new();
    Effect::new(move |_| {
        poll.track();
        let Some(current) = station.with(|state| state.loaded().cloned()) else {
            return;
        };
        spawn_local(backend.load_into(latest, move |client, session| async move {
            client.latest_readings(&session, &current).await
        }));
    });

    let poller: StoredValue<Option<IntervalHandle>> = StoredValue::new(None);
    Effect::new(move |_| {
        let interval = settings.with(Settings::refresh_interval);
        if let Some(handle) = poller.get_value() {
            handle.clear();
        }
        log::debug!("Polling latest readings every {}s", interval.as_secs());
        match set_interval_with_handle(move || poll.notify(), interval) {
            Ok(handle) => poller.set_value(Some(handle)),
            Err(err) => log::error!("Failed to start polling: {err:?}"),
        }
    });
    on_cleanup(move || {
        if let Some(handle) = poller.get_value() {
            handle.clear();
        }
    });

    let readings_view = move |station: &StationData| {
        latest.with(|state| match state {
            LoadState::Loading => view! { <Spinner label="Loading readings" /> }.into_any(),
            LoadState::Failed(error) => view! { <LoadError error=error.clone() /> }.into_any(),
            LoadState::Loaded(readings) => {
                let cards = settings.with(|settings| {
                    ui.with_value(|ui| metric_cards(station, readings, settings, ui, now.get()))
                });
                if cards.is_empty() {
                    view! { <Text>"This station has not reported any readings yet"</Text> }
                        .into_any()
                } else {
                    view! { <Grid class="metric-grid">{cards}</Grid> }.into_any()
                }
            }
        })
    };

    view! {
        <Layout class="station-layout">
            {render_load_state(
                station,
                move |station: &StationData| {
                    let current = station.clone();
                    let polled = station.clone();
                    let last_seen = Signal::derive(move || {
                        latest.with(|state| match state.loaded() {
                            Some(readings) => polled.last_seen(readings),
                            None => polled.last_reading,
                        })
                    });
                    view! {
                        <Flex vertical=true gap=FlexGap::Medium>
                            <StationHeader station=station.clone() last_seen now />
                            {move || readings_view(&current)}
                        </Flex>
                    }
                },
            )}
        </Layout>
    }
}
