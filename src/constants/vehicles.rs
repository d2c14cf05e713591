/// Vehicle name and class resolved from the `VehicleId` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleInfo {
    pub name: &'static str,
    pub class: &'static str,
}

/// AMS2 vehicle lookup, keyed by the id the stats file reports.
pub fn vehicle_info(vehicle_id: i64) -> Option<VehicleInfo> {
    let (name, class) = match vehicle_id {
        9617015 => ("Chevrolet Corvette Z06 GT3.R", "GT3_Gen2"),
        16119375 => ("Cadillac V-Series.R", "LMDh"),
        24108228 => ("Porsche 911 RSR GTE", "GTE"),
        65306143 => ("Sauber Mercedes C9", "Group C"),
        160008140 => ("Mercedes-AMG GT3 Evo", "GT3_Gen2"),
        277015108 => ("BMW M4 GT3", "GT3_Gen2"),
        446386426 => ("Porsche 911 GT3 R (992)", "GT3_Gen2"),
        527532517 => ("Lamborghini Huracan GT3 Evo2", "GT3_Gen2"),
        705385572 => ("McLaren 720S GT3 Evo", "GT3_Gen2"),
        840601134 => ("Audi R8 LMS GT3 Evo2", "GT3_Gen2"),
        955978313 => ("Ferrari 296 GT3", "GT3_Gen2"),
        1323381033 => ("Aston Martin Vantage AMR GT3 Evo", "GT3_Gen2"),
        1836524676 => ("BMW M6 GT3", "GT3"),
        2111180111 => ("McLaren 720S GT3", "GT3"),
        -2140200557 => ("Mercedes-AMG GT3", "GT3"),
        -1965285011 => ("Porsche 911 GT3 R", "GT3"),
        -1841616093 => ("Audi R8 LMS GT3", "GT3"),
        -1731182006 => ("Lamborghini Huracan GT3", "GT3"),
        -1403590095 => ("BMW M8 GTE", "GTE"),
        -1132626880 => ("Corvette C8.R GTE", "GTE"),
        -969211898 => ("Porsche 963 LMDh", "LMDh"),
        -903438146 => ("BMW M Hybrid V8", "LMDh"),
        -707407162 => ("Alpine A442", "Group C"),
        -512007425 => ("Porsche 962C", "Group C"),
        -277682337 => ("Mercedes-AMG GT4", "GT4"),
        -143792514 => ("Porsche 718 Cayman GT4 Clubsport", "GT4"),
        -86482662 => ("BMW M4 GT4", "GT4"),
        _ => return None,
    };
    Some(VehicleInfo { name, class })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vehicle_resolves() {
        let info = vehicle_info(160008140).unwrap();
        assert_eq!(info.name, "Mercedes-AMG GT3 Evo");
        assert_eq!(info.class, "GT3_Gen2");
    }

    #[test]
    fn unknown_vehicle_is_none() {
        assert!(vehicle_info(1).is_none());
    }
}
