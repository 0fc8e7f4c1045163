use leptos::prelude::*;
use models::{Metric, WidgetKind};
use thaw::{Card, CardFooter, CardHeader, CardPreview, Flex, FlexAlign, Icon, Text, TextTag};

use super::{Compass, Gauge};
use crate::app::icons::sensor_icon;

/// Visual for a single current reading.
#[component]
pub fn MetricWidget(metric: Metric) -> impl IntoView {
    match metric.widget {
        WidgetKind::Gauge => view! { <Gauge metric /> }.into_any(),
        WidgetKind::Compass => view! { <Compass metric /> }.into_any(),
        // a single reading has no history to chart
        WidgetKind::Chart | WidgetKind::Text => {
            view! { <div class="metric-text">{metric.text}</div> }.into_any()
        }
    }
}

/// Card around a metric widget, linking to the sensor's history.
#[component]
pub fn MetricCard(
    metric: Metric,
    #[prop(into)] href: String,
    #[prop(into)] details: Option<String>,
    #[prop(into)] updated: String,
) -> impl IntoView {
    let icon = sensor_icon(metric.icon);
    let label = metric.label.clone();
    view! {
        <Card class="metric-card">
            <CardHeader>
                <Flex align=FlexAlign::Center>
                    <Icon icon width="1.5em" height="1.5em" />
                    <a class="metric-title" href=href>
                        {label}
                    </a>
                </Flex>
            </CardHeader>
            <CardPreview>
                <MetricWidget metric />
            </CardPreview>
            <CardFooter>
                <Flex vertical=true>
                    {details.map(|details| view! { <Text class="metric-details">{details}</Text> })}
                    <Text tag=TextTag::Em class="metric-updated">
                        {updated}
                    </Text>
                </Flex>
            </CardFooter>
        </Card>
    }
}
