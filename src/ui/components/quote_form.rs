use dioxus::prelude::*;

use crate::{
    app::QuoteController,
    domain::{Finish, LeadTime, Material, QuoteOptions, SessionEvent},
};

#[component]
pub fn QuoteCustomization(options: QuoteOptions) -> Element {
    let controller = use_context::<QuoteController>();

    let on_quantity = {
        let options = options.clone();
        move |evt: Event<FormData>| {
            controller.dispatch(SessionEvent::OptionsChanged(
                options.with_quantity_input(&evt.value()),
            ))
        }
    };
    let on_material = {
        let options = options.clone();
        move |evt: Event<FormData>| {
            if let Ok(material) = evt.value().parse::<Material>() {
                controller.dispatch(SessionEvent::OptionsChanged(options.with_material(material)));
            }
        }
    };
    let on_finish = {
        let options = options.clone();
        move |evt: Event<FormData>| {
            if let Ok(finish) = evt.value().parse::<Finish>() {
                controller.dispatch(SessionEvent::OptionsChanged(options.with_finish(finish)));
            }
        }
    };
    let on_lead_time = {
        let options = options.clone();
        move |evt: Event<FormData>| {
            if let Ok(lead_time) = evt.value().parse::<LeadTime>() {
                controller.dispatch(SessionEvent::OptionsChanged(
                    options.with_lead_time(lead_time),
                ));
            }
        }
    };

    rsx! {
        div { class: "panel",
            div { class: "panel-body",
                h3 { class: "section-title", "Customize Your Quote" }
                div { class: "form-grid",
                    div {
                        label { class: "field-label", r#for: "quantity", "Quantity" }
                        input {
                            id: "quantity",
                            class: "field-input",
                            r#type: "number",
                            min: "1",
                            value: "{options.quantity}",
                            oninput: on_quantity,
                        }
                    }
                    SelectField {
                        label: "Material",
                        name: "material",
                        value: options.material.label(),
                        choices: Material::ALL.iter().map(Material::label).collect::<Vec<_>>(),
                        onchange: on_material,
                    }
                    SelectField {
                        label: "Finish",
                        name: "finish",
                        value: options.finish.label(),
                        choices: Finish::ALL.iter().map(Finish::label).collect::<Vec<_>>(),
                        onchange: on_finish,
                    }
                    SelectField {
                        label: "Lead Time",
                        name: "leadTime",
                        value: options.lead_time.label(),
                        choices: LeadTime::ALL.iter().map(LeadTime::label).collect::<Vec<_>>(),
                        onchange: on_lead_time,
                    }
                }
            }
        }
    }
}

#[component]
fn SelectField(
    label: &'static str,
    name: &'static str,
    value: &'static str,
    choices: Vec<&'static str>,
    onchange: EventHandler<Event<FormData>>,
) -> Element {
    rsx! {
        div {
            label { class: "field-label", r#for: name, "{label}" }
            select {
                id: name,
                class: "field-input",
                onchange: move |evt| onchange.call(evt),
                for choice in choices {
                    option { value: choice, selected: choice == value, "{choice}" }
                }
            }
        }
    }
}
