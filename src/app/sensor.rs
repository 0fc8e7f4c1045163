use chrono::Utc;
use leptos::{prelude::*, task::spawn_local};
use models::*;
use thaw::{
    Flex, FlexAlign, FlexGap, FlexJustify, Layout, MessageBar, MessageBarBody, MessageBarIntent,
    Select, Spinner, Text, TextTag,
};

use super::{
    fetch::{render_load_state, Backend, LoadError, LoadState},
    readings_table::ReadingsTable,
    settings::SettingsInjection,
    station::{aggregate_details, load_station, UiConfigInjection},
    widgets::{Chart, MetricWidget},
};

/// History that cannot be charted is shown as its newest reading.
fn latest_widget(
    sensor: &SensorData,
    readings: &[ReadingData],
    settings: &Settings,
    ui: &UiConfigManager,
) -> Option<AnyView> {
    let reader = MetricReader::new(&settings.units, &settings.display, ui);
    let newest = readings
        .iter()
        .filter(|reading| reading.sensor_id == sensor.id)
        .max_by_key(|reading| reading.timestamp)?;
    match reader.read(sensor, newest) {
        Ok(metric) => {
            let details = aggregate_details(&reader, &metric);
            Some(
                view! {
                    <Flex vertical=true align=FlexAlign::Center>
                        <MetricWidget metric />
                        {details.map(|details| view! { <Text>{details}</Text> })}
                    </Flex>
                }
                .into_any(),
            )
        }
        Err(err) => {
            log::error!("Cannot show reading of sensor {}: {err}", sensor.id);
            None
        }
    }
}

fn history_view(
    sensor: &SensorData,
    readings: &[ReadingData],
    settings: &Settings,
    ui: &UiConfigManager,
) -> AnyView {
    let reader = MetricReader::new(&settings.units, &settings.display, ui);
    let series = match reader.series(sensor, readings) {
        Ok(series) => series,
        Err(err) => {
            return view! { <LoadError error=err.into() /> }.into_any();
        }
    };
    if series.points.is_empty() {
        return view! { <Text>"No readings in this time range"</Text> }.into_any();
    }
    let display = settings.display.clone();
    let overview = if ui.widget_for(sensor, true) == WidgetKind::Chart {
        view! { <Chart series=series.clone() display=display.clone() /> }.into_any()
    } else {
        latest_widget(sensor, readings, settings, ui)
            .unwrap_or_else(|| view! { <div class="hidden" /> }.into_any())
    };
    view! {
        <Flex vertical=true gap=FlexGap::Medium>
            {overview}
            <ReadingsTable series display />
        </Flex>
    }
    .into_any()
}

/// Reading history of one sensor over a selectable time range.
#[component]
pub fn SensorView(station_id: String, sensor_id: String) -> impl IntoView {
    let backend = Backend::expect_context();
    let settings = SettingsInjection::expect_context();
    let ui = UiConfigInjection::expect_context();
    let station = load_station(backend, station_id);
    let sensor_id = StoredValue::new(sensor_id);

    let range_value = RwSignal::new(HistoryRange::default().as_str().to_string());
    let range = Memo::new(move |_| HistoryRange::from_name(&range_value.get()).unwrap_or_default());
    let history = RwSignal::new(LoadState::<Vec<ReadingData>>::Loading);
    Effect::new(move |_| {
        let range = range.get();
        let Some(current) = station.with(|state| state.loaded().cloned()) else {
            return;
        };
        if current.sensor(&sensor_id.get_value()).is_none() {
            return;
        }
        history.set(LoadState::Loading);
        let query = ReadingsQuery::history(&sensor_id.get_value(), range, Utc::now());
        spawn_local(backend.load_into(history, move |client, session| async move {
            client.readings(&session, &current, &query).await
        }));
    });

    let history_content = move |sensor: &SensorData| {
        history.with(|state| match state {
            LoadState::Loading => view! { <Spinner label="Loading history" /> }.into_any(),
            LoadState::Failed(error) => view! { <LoadError error=error.clone() /> }.into_any(),
            LoadState::Loaded(readings) => settings.with(|settings| {
                ui.with_value(|ui| history_view(sensor, readings, settings, ui))
            }),
        })
    };

    let default_range = range_value.get_untracked();
    view! {
        <Layout class="sensor-layout">
            {render_load_state(
                station,
                move |station: &StationData| {
                    let Some(sensor) = station.sensor(&sensor_id.get_value()).cloned() else {
                        return view! {
                            <MessageBar intent=MessageBarIntent::Warning>
                                <MessageBarBody>
                                    {format!(
                                        "{} has no sensor {}",
                                        station.display_name(),
                                        sensor_id.get_value(),
                                    )}
                                </MessageBarBody>
                            </MessageBar>
                        }
                            .into_any();
                    };
                    let label = ui.with_value(|ui| ui.config_for(&sensor.sensor_type).label);
                    let station_href = Route::Station {
                        id: station.id.clone(),
                    }
                        .to_hash();
                    view! {
                        <Flex vertical=true gap=FlexGap::Medium>
                            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                                <Flex vertical=true>
                                    <Text tag=TextTag::H2>
                                        {format!("{label} ({})", sensor.location)}
                                    </Text>
                                    <a href=station_href>{station.display_name()}</a>
                                </Flex>
                                <Select default_value=default_range.clone() value=range_value>
                                    {HistoryRange::ALL
                                        .into_iter()
                                        .map(|range| {
                                            view! {
                                                <option label=range.to_string() value=range.as_str() />
                                            }
                                        })
                                        .collect::<Vec<_>>()}
                                </Select>
                            </Flex>
                            {move || history_content(&sensor)}
                        </Flex>
                    }
                        .into_any()
                },
            )}
        </Layout>
    }
}
