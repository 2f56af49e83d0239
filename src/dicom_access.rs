//
// dicom_access.rs
// dicom2bmp
//
// Tag constants and typed accessors used to pull rescale, window and photometric attributes out of a dataset.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom::core::Tag;
use dicom::object::DefaultDicomObject;

pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
pub const VOI_LUT_FUNCTION: Tag = Tag(0x0028, 0x1056);
pub const PIXEL_DATA: Tag = Tag(0x7fe0, 0x0010);

/// Small helper trait to pull typed values out of a DICOM object.
pub trait ElementAccess {
    fn element_str(&self, tag: Tag) -> Option<String>;
    /// First numeric value of the element; multi-valued DS fields yield their first entry.
    fn element_f64(&self, tag: Tag) -> Option<f64>;
    fn has_element(&self, tag: Tag) -> bool;
    /// SOP Class UID from the dataset, falling back to the file meta group.
    fn sop_class_uid(&self) -> Option<String>;
}

impl ElementAccess for DefaultDicomObject {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.trim_end_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn element_f64(&self, tag: Tag) -> Option<f64> {
        let element = self.element(tag).ok()?;
        element
            .to_multi_float64()
            .ok()
            .and_then(|values| values.first().copied())
            .or_else(|| element.to_float64().ok())
    }

    fn has_element(&self, tag: Tag) -> bool {
        self.element(tag).is_ok()
    }

    fn sop_class_uid(&self) -> Option<String> {
        self.element_str(SOP_CLASS_UID).or_else(|| {
            let uid = self.meta().media_storage_sop_class_uid.trim_end_matches('\0');
            (!uid.is_empty()).then(|| uid.to_string())
        })
    }
}
