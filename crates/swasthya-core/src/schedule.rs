//! Static vaccination-schedule reference content.

/// True when the (English) query asks for the vaccination schedule.
pub fn is_schedule_request(text: &str) -> bool {
  let text = text.to_lowercase();
  text.contains("vaccine") && text.contains("schedule")
}

/// India's childhood immunisation schedule, grouped by age.
pub const VACCINE_SCHEDULE: &str = "\
💉 *Complete Vaccine Schedule (India)*

👶 **At Birth**
- BCG (Tuberculosis)
- Hepatitis B (1st dose)
- OPV 0 (Oral Polio Vaccine)

🗓️ **6 Weeks**
- DTP (1st dose)
- IPV (Polio - 1st dose)
- Hepatitis B (2nd dose)
- Hib (1st dose)
- Rotavirus (1st dose)
- PCV (Pneumococcal - 1st dose)

🗓️ **10 Weeks**
- DTP (2nd dose)
- IPV (2nd dose)
- Hib (2nd dose)
- Rotavirus (2nd dose)
- PCV (2nd dose)

🗓️ **14 Weeks**
- DTP (3rd dose)
- IPV (3rd dose)
- Hib (3rd dose)
- Rotavirus (3rd dose)
- PCV (3rd dose)

🎂 **9–12 Months**
- Measles / MMR
- JE vaccine (in endemic areas)
- Hepatitis A (1st dose)
- PCV booster

🧒 **15–18 Months**
- DTP booster
- Hib booster
- MMR (2nd dose)
- Varicella

👧 **4–6 Years**
- DTP booster
- Polio booster
- MMR (3rd dose)
- Varicella (2nd dose)

🧑 **10–12 Years**
- Tdap
- HPV (for girls)
- Typhoid booster
";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn needs_both_words() {
    assert!(is_schedule_request("Vaccine Schedule"));
    assert!(is_schedule_request("what is the schedule for my vaccine?"));
    assert!(!is_schedule_request("vaccine"));
    assert!(!is_schedule_request("schedule"));
  }
}
