use models::SensorIcon;

pub fn sensor_icon(icon: SensorIcon) -> icondata_core::Icon {
    match icon {
        SensorIcon::Thermometer => icondata::MdiThermometer,
        SensorIcon::Droplet => icondata::MdiWaterPercent,
        SensorIcon::Barometer => icondata::MdiGauge,
        SensorIcon::Wind => icondata::MdiWeatherWindy,
        SensorIcon::Compass => icondata::MdiCompassOutline,
        SensorIcon::Rain => icondata::MdiWeatherRainy,
        SensorIcon::Sun => icondata::MdiWeatherSunny,
        SensorIcon::Uv => icondata::MdiWeatherSunnyAlert,
        SensorIcon::Eye => icondata::MdiEyeOutline,
        SensorIcon::Battery => icondata::MdiBattery,
        SensorIcon::Unknown => icondata::MdiHelpCircleOutline,
    }
}
