//! Parsers for gphoto2 text output

use photobooth_core::CameraInfo;

/// Split `Key: value` lines into lowercase key and trimmed value
fn key_values<'a>(output: &'a str) -> impl Iterator<Item = (String, &'a str)> + 'a {
    output.lines().filter_map(|line| {
        let (key, value) = line.trim().split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim()))
    })
}

/// Fill model, manufacturer, serial, lens and battery from `--summary`
pub(crate) fn parse_summary(output: &str, info: &mut CameraInfo) {
    for (key, value) in key_values(output) {
        let slot = match key.as_str() {
            "model" => &mut info.model,
            "manufacturer" => &mut info.manufacturer,
            "serial number" => &mut info.serial_number,
            "lens name" => &mut info.lens_name,
            "battery level" => &mut info.battery_level,
            _ => continue,
        };
        *slot = value.to_string();
    }
}

/// Fill card capacity and free space from `--storage-info`
pub(crate) fn parse_storage(output: &str, info: &mut CameraInfo) {
    for line in output.lines() {
        // storage-info uses key=value
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key.trim().to_lowercase().as_str() {
            "totalcapacity" => info.storage_total = value.trim().to_string(),
            "free" => info.storage_free = value.trim().to_string(),
            _ => {}
        }
    }
    // older gphoto2 builds print `Key: value`
    for (key, value) in key_values(output) {
        match key.as_str() {
            "totalcapacity" if info.storage_total.is_empty() => {
                info.storage_total = value.to_string();
            }
            "free" if info.storage_free.is_empty() => info.storage_free = value.to_string(),
            _ => {}
        }
    }
}

/// One entry of `--list-files`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CardFile {
    /// Number accepted by `--get-file`
    pub number: u32,
    /// File name on the card
    pub name: String,
    /// Unix time reported by the camera, if any
    pub timestamp: Option<i64>,
}

impl CardFile {
    fn extension(&self) -> String {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub(crate) fn is_jpeg(&self) -> bool {
        matches!(self.extension().as_str(), "jpg" | "jpeg")
    }

    pub(crate) fn is_raw(&self) -> bool {
        matches!(
            self.extension().as_str(),
            "cr2" | "cr3" | "nef" | "arw" | "raf" | "dng" | "orf" | "rw2" | "pef"
        )
    }
}

/// Parse `#N  NAME  flags  size ... timestamp` lines of `--list-files`
pub(crate) fn parse_file_list(output: &str) -> Vec<CardFile> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let number = tokens.next()?.strip_prefix('#')?.parse().ok()?;
            let name = tokens.next()?.to_string();
            let timestamp = line
                .split_whitespace()
                .last()
                .and_then(|t| t.parse::<i64>().ok())
                .filter(|t| *t > 1_000_000_000);
            Some(CardFile {
                number,
                name,
                timestamp,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "Camera summary:\n\
        Manufacturer: Canon Inc.\n\
        Model: Canon EOS 700D\n\
          Version: 3-1.1.4\n\
          Serial Number: 0123456789\n\
        Lens Name: EF-S18-55mm f/3.5-5.6 IS STM\n\
        Battery Level: 75%\n\
        Vendor Extension ID: 0xb (1.0)\n";

    #[test]
    fn test_parse_summary() {
        let mut info = CameraInfo::default();
        parse_summary(SUMMARY, &mut info);
        assert_eq!(info.model, "Canon EOS 700D");
        assert_eq!(info.manufacturer, "Canon Inc.");
        assert_eq!(info.serial_number, "0123456789");
        assert_eq!(info.lens_name, "EF-S18-55mm f/3.5-5.6 IS STM");
        assert_eq!(info.battery_level, "75%");
    }

    #[test]
    fn test_parse_storage() {
        let output = "[Storage 0]\n\
            label=SD\n\
            access=0 - Read-Write\n\
            totalcapacity=31154688 KB\n\
            free=29425664 KB\n";
        let mut info = CameraInfo::default();
        parse_storage(output, &mut info);
        assert_eq!(info.storage_total, "31154688 KB");
        assert_eq!(info.storage_free, "29425664 KB");

        let mut legacy = CameraInfo::default();
        parse_storage("TotalCapacity: 32 GB\nFree: 28 GB\n", &mut legacy);
        assert_eq!(legacy.storage_total, "32 GB");
        assert_eq!(legacy.storage_free, "28 GB");
    }

    #[test]
    fn test_parse_file_list() {
        let output = "There are 3 files in folder '/store_00020001/DCIM/100CANON':\n\
            #1     IMG_0001.JPG               rd  5134 KB 5184x3456 image/jpeg 1700000000\n\
            #2     IMG_0001.CR2               rd 24000 KB image/x-canon-cr2 1700000001\n\
            #3     MVI_0002.MOV               rd 90000 KB video/quicktime\n";
        let files = parse_file_list(output);
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].number, 1);
        assert!(files[0].is_jpeg());
        assert_eq!(files[0].timestamp, Some(1_700_000_000));
        assert!(files[1].is_raw());
        assert_eq!(files[2].timestamp, None);
        assert!(!files[2].is_jpeg() && !files[2].is_raw());
    }

    #[test]
    fn test_parse_file_list_empty_folder() {
        assert!(parse_file_list("There is no file in folder '/'.\n").is_empty());
    }
}
