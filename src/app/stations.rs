use chrono::{DateTime, Utc};
use leptos::{prelude::*, task::spawn_local};
use models::{format_relative, Route, StationData};
use shared_constants::{CLOCK_TICK_INTERVAL, STATION_SEARCH_SIMILARITY, STATION_STALE_AFTER};
use strsim::jaro_winkler;
use thaw::{
    Badge, BadgeAppearance, BadgeColor, BadgeSize, Button, ButtonAppearance, Card, CardHeader,
    CardPreview, Flex, FlexAlign, FlexGap, FlexJustify, Grid, GridItem, Input, Layout, Select,
    Table, TableBody, TableCell, TableRow, Text, TextTag,
};

use super::fetch::{render_load_state, Backend, LoadState};

/// Substring match on station fields, or a close fuzzy match on the name
/// to forgive typos.
fn station_matches(station: &StationData, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    station.matches_query(&query)
        || jaro_winkler(&query, &station.display_name().to_lowercase())
            >= STATION_SEARCH_SIMILARITY
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SortKind {
    NameAsc,
    NameDesc,
    LastReadingDesc,
    LastReadingAsc,
}

impl SortKind {
    fn from_name(name: &str) -> Option<SortKind> {
        match name {
            "NameAsc" => Some(SortKind::NameAsc),
            "NameDesc" => Some(SortKind::NameDesc),
            "LastReadingDesc" => Some(SortKind::LastReadingDesc),
            "LastReadingAsc" => Some(SortKind::LastReadingAsc),
            _ => None,
        }
    }

    fn sort(self, stations: &mut [StationData]) {
        match self {
            SortKind::NameAsc => stations.sort_by_key(|s| s.display_name().to_lowercase()),
            SortKind::NameDesc => stations
                .sort_by_key(|s| std::cmp::Reverse(s.display_name().to_lowercase())),
            SortKind::LastReadingDesc => {
                stations.sort_by_key(|s| std::cmp::Reverse(s.last_reading))
            }
            SortKind::LastReadingAsc => stations.sort_by_key(|s| s.last_reading),
        }
    }
}

/// Current time, advanced periodically so relative timestamps age.
pub fn ticking_clock() -> ReadSignal<DateTime<Utc>> {
    let (now, set_now) = signal(Utc::now());
    match set_interval_with_handle(move || set_now.set(Utc::now()), CLOCK_TICK_INTERVAL) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => log::error!("Failed to start clock: {err:?}"),
    }
    now
}

#[component]
fn StationCard(station: StationData, now: ReadSignal<DateTime<Utc>>) -> impl IntoView {
    let href = Route::Station {
        id: station.id.clone(),
    }
    .to_hash();
    let last_reading = station.last_reading;
    let stale = Signal::derive(move || {
        models::is_stale(last_reading, now.get(), STATION_STALE_AFTER)
    });
    let last_seen = move || match last_reading {
        Some(ts) => format_relative(&ts, &now.get()),
        None => "never".to_string(),
    };
    let sensors = station
        .sensors
        .iter()
        .map(|sensor| sensor.sensor_type.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    view! {
        <GridItem>
            <Card class="station-card">
                <CardHeader>
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <a class="station-title" href=href>
                            {station.display_name()}
                        </a>
                        {move || {
                            if stale.get() {
                                view! {
                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Danger>
                                        "Offline"
                                    </Badge>
                                }
                                    .into_any()
                            } else {
                                view! {
                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Success>
                                        "Online"
                                    </Badge>
                                }
                                    .into_any()
                            }
                        }}
                    </Flex>
                </CardHeader>
                <CardPreview>
                    <Table>
                        <TableBody>
                            <TableRow>
                                <TableCell>
                                    <Text tag=TextTag::Em>"Model"</Text>
                                </TableCell>
                                <TableCell>{station.model.clone()}</TableCell>
                            </TableRow>
                            <TableRow>
                                <TableCell>
                                    <Text tag=TextTag::Em>"Location"</Text>
                                </TableCell>
                                <TableCell>
                                    {station.location.clone().unwrap_or_else(|| models::MISSING_VALUE.to_string())}
                                </TableCell>
                            </TableRow>
                            <TableRow>
                                <TableCell>
                                    <Text tag=TextTag::Em>"Sensors"</Text>
                                </TableCell>
                                <TableCell>{sensors}</TableCell>
                            </TableRow>
                            <TableRow>
                                <TableCell>
                                    <Text tag=TextTag::Em>"Last reading"</Text>
                                </TableCell>
                                <TableCell>{last_seen}</TableCell>
                            </TableRow>
                        </TableBody>
                    </Table>
                </CardPreview>
            </Card>
        </GridItem>
    }
}

/// Station list with quick filter and sorting
#[component]
pub fn Stations() -> impl IntoView {
    let backend = Backend::expect_context();
    let stations = RwSignal::new(LoadState::<Vec<StationData>>::Loading);
    let reload = Trigger::new();
    Effect::new(move |_| {
        reload.track();
        spawn_local(backend.load_into(stations, |client, session| async move {
            client.stations(&session).await
        }));
    });

    let now = ticking_clock();
    let query = RwSignal::new(String::new());
    let sort_value = RwSignal::new("NameAsc".to_string());
    let sort_kind = Memo::new(move |_| {
        SortKind::from_name(&sort_value.get()).unwrap_or(SortKind::NameAsc)
    });
    let counts = Memo::new(move |_| {
        stations.with(|state| {
            state.loaded().map(|all| {
                let query = query.get();
                let shown = all
                    .iter()
                    .filter(|station| station_matches(station, &query))
                    .count();
                (shown, all.len())
            })
        })
    });

    let on_reload_click = move |_| reload.notify();

    view! {
        <Layout class="stations-layout">
            <Flex vertical=true gap=FlexGap::Small>
                <Flex gap=FlexGap::Small align=FlexAlign::Center justify=FlexJustify::Start>
                    <Input value=query placeholder="Quick filter" class="input" />
                    <Text>"Sort by"</Text>
                    <Select default_value="NameAsc" value=sort_value>
                        <option label="Name (Ascending)" value="NameAsc" />
                        <option label="Name (Descending)" value="NameDesc" />
                        <option label="Last reading (Newest)" value="LastReadingDesc" />
                        <option label="Last reading (Oldest)" value="LastReadingAsc" />
                    </Select>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=on_reload_click
                        icon=icondata::MdiRefresh
                    />
                    {move || {
                        counts
                            .get()
                            .map(|(shown, total)| {
                                view! {
                                    <Badge
                                        appearance=BadgeAppearance::Tint
                                        size=BadgeSize::Large
                                        color=BadgeColor::Subtle
                                    >
                                        {format!("{shown} / {total}")}
                                    </Badge>
                                }
                            })
                    }}
                </Flex>
                {render_load_state(
                    stations,
                    move |all: &Vec<StationData>| {
                        let query = query.get();
                        let mut shown = all
                            .iter()
                            .filter(|station| station_matches(station, &query))
                            .cloned()
                            .collect::<Vec<_>>();
                        sort_kind.get().sort(&mut shown);
                        if shown.is_empty() {
                            return view! { <Text>"No stations match"</Text> }.into_any();
                        }
                        view! {
                            <Grid class="station-grid">
                                {shown
                                    .into_iter()
                                    .map(|station| view! { <StationCard station now /> })
                                    .collect::<Vec<_>>()}
                            </Grid>
                        }
                            .into_any()
                    },
                )}
            </Flex>
        </Layout>
    }
}

