use leptos::prelude::*;
use models::{DisplaySettings, Series};
use thaw::{Table, TableBody, TableCell, TableHeader, TableHeaderCell, TableRow};

/// Component to render a series as a table, newest reading first
#[component]
pub fn ReadingsTable(series: Series, display: DisplaySettings) -> impl IntoView {
    if series.points.is_empty() {
        return view! { <p class="hidden"></p> }.into_any();
    }
    let aggregated = series.aggregated;
    let rows = series
        .points
        .iter()
        .rev()
        .map(|point| {
            let value = display.quantity(point.value, series.unit, series.precision);
            let extremes = aggregated.then(|| {
                view! {
                    <TableCell>
                        {display.quantity(point.min, series.unit, series.precision)}
                    </TableCell>
                    <TableCell>
                        {display.quantity(point.max, series.unit, series.precision)}
                    </TableCell>
                    <TableCell>{point.count}</TableCell>
                }
            });
            view! {
                <TableRow>
                    <TableCell>{display.timestamp(&point.timestamp)}</TableCell>
                    <TableCell>{value}</TableCell>
                    {extremes}
                </TableRow>
            }
        })
        .collect::<Vec<_>>();
    let extreme_headers = aggregated.then(|| {
        view! {
            <TableHeaderCell resizable=true>"Min"</TableHeaderCell>
            <TableHeaderCell resizable=true>"Max"</TableHeaderCell>
            <TableHeaderCell resizable=true>"Samples"</TableHeaderCell>
        }
    });
    view! {
        <Table class="readings-table">
            <TableHeader>
                <TableRow>
                    <TableHeaderCell resizable=true>"Time"</TableHeaderCell>
                    <TableHeaderCell resizable=true>
                        {if aggregated { "Average" } else { "Value" }}
                    </TableHeaderCell>
                    {extreme_headers}
                </TableRow>
            </TableHeader>
            <TableBody>{rows}</TableBody>
        </Table>
    }
    .into_any()
}
