use egui::Ui;
use maneloca_protocol::BuildVersion;

/// Two-state build selector. Returns the newly picked build, if any.
pub fn version_switch(ui: &mut Ui, current: BuildVersion) -> Option<BuildVersion> {
    let mut selected = current;
    ui.horizontal(|ui| {
        for version in BuildVersion::ALL {
            ui.selectable_value(&mut selected, version, version.name());
        }
    });
    (selected != current).then_some(selected)
}
