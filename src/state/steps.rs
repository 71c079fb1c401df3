/// The fixed eight-step intake layout
///
/// Field names are the backend's wire contract and must not change.
use super::form::{Control, OptionGroup, StepExtra, StepForm};

pub const TOTAL_STEPS: usize = 8;

pub const GENDERS: &[&str] = &["Mujer", "Hombre", "Otro"];

pub const OCCASIONS: &[&str] = &["Casual", "Formal", "Deportiva"];

pub const FITS: &[&str] = &["Ajustado", "Regular", "Holgado"];

pub const MONTHS: &[&str] = &[
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio",
    "Julio", "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

pub const PROVINCES: &[&str] = &[
    "A Coruña", "Álava", "Albacete", "Alicante", "Almería", "Asturias",
    "Ávila", "Badajoz", "Barcelona", "Burgos", "Cáceres", "Cádiz",
    "Cantabria", "Castellón", "Ciudad Real", "Córdoba", "Cuenca", "Girona",
    "Granada", "Guadalajara", "Gipuzkoa", "Huelva", "Huesca", "Illes Balears",
    "Jaén", "La Rioja", "Las Palmas", "León", "Lleida", "Lugo",
    "Madrid", "Málaga", "Murcia", "Navarra", "Ourense", "Palencia",
    "Pontevedra", "Salamanca", "Santa Cruz de Tenerife", "Segovia", "Sevilla", "Soria",
    "Tarragona", "Teruel", "Toledo", "Valencia", "Valladolid", "Bizkaia",
    "Zamora", "Zaragoza", "Ceuta", "Melilla",
];

/// Garment exclusions offered on the fit step
pub const EXCLUSIONS: &[(&str, &str)] = &[
    ("no_vestidos", "I don't wear dresses"),
    ("no_faldas", "I don't wear skirts"),
    ("no_pantalones", "I don't wear trousers"),
    ("no_tops", "I don't wear tops"),
];

/// Build a fresh set of step forms, one per step, in order
pub fn build_steps() -> Vec<StepForm> {
    let mut fit = StepForm::new(6, "How do you like your clothes to fit?")
        .with_control(Control::hidden("fit").required())
        .with_group(OptionGroup::new("fit", FITS));
    for (name, label) in EXCLUSIONS {
        fit = fit.with_control(Control::checkbox(name, label));
    }

    vec![
        StepForm::new(1, "What's your name?")
            .with_control(Control::text("nombre", "Name").required()),
        StepForm::new(2, "How do you identify?")
            .with_control(Control::hidden("genero").required())
            .with_group(OptionGroup::new("genero", GENDERS)),
        StepForm::new(3, "Where are you?")
            .with_control(Control::select("provincia", "Province", PROVINCES).required()),
        StepForm::new(4, "When will you wear it?")
            .with_control(Control::select("mes", "Month", MONTHS).required()),
        StepForm::new(5, "What's the occasion?")
            .with_control(Control::hidden("ocasion").required())
            .with_group(OptionGroup::new("ocasion", OCCASIONS)),
        fit,
        StepForm::new(7, "Add a photo")
            .with_control(Control::file("photo", "Photo"))
            .with_extra(StepExtra::Photo),
        StepForm::new(8, "Review and confirm").with_extra(StepExtra::Summary),
    ]
}
