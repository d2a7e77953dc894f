//! Command-line commands and their text rendering.

use chrono::{NaiveDate, NaiveTime};
use medibook_core::{
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, AppointmentStatus},
        availability::{AvailabilityRecord, AvailabilityWindow, CreateAvailabilityRequest, DayOfWeek},
        doctor::{Doctor, DoctorSearch},
        medical_record::MedicalRecord,
        time_of_day::parse_time_of_day,
        user::UserProfile,
    },
    slots::SlotOutcome,
};
use uuid::Uuid;

use crate::{
    api::{AppointmentScope, BookingApi},
    config::ScopeKind,
    flow::{BookingFlow, BookingOutcome},
};

pub const USAGE: &str = "\
Usage: medibook <command>

Commands:
  profile
  search [--name NAME] [--specialization SPECIALIZATION]
  doctor <doctor-id>
  slots <doctor-id>
  book <doctor-id> <YYYY-MM-DD> <HH:MM> <reason...>
  appointments
  cancel <appointment-id>
  confirm <appointment-id> [--notes NOTES...]
  complete <appointment-id> [--notes NOTES...]
  records
  availability
  availability add <day> <HH:MM> <HH:MM>
  availability remove <availability-id>
  help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Profile,
    Search(DoctorSearch),
    Doctor { doctor_id: Uuid },
    Slots { doctor_id: Uuid },
    Book {
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        reason: String,
    },
    Appointments,
    Cancel { appointment_id: i64 },
    Confirm {
        appointment_id: i64,
        notes: Option<String>,
    },
    Complete {
        appointment_id: i64,
        notes: Option<String>,
    },
    Records,
    Availability,
    AddAvailability(AvailabilityWindow),
    RemoveAvailability { availability_id: i64 },
    Help,
}

fn usage_error(message: impl Into<String>) -> BookingError {
    BookingError::Validation(format!("{}\n\n{}", message.into(), USAGE))
}

fn next_arg(args: &mut impl Iterator<Item = String>, name: &str) -> BookingResult<String> {
    args.next()
        .ok_or_else(|| usage_error(format!("Missing <{}>", name)))
}

fn parse_uuid(value: &str, name: &str) -> BookingResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| BookingError::Validation(format!("Invalid {}: {:?}", name, value)))
}

fn parse_id(value: &str, name: &str) -> BookingResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| BookingError::Validation(format!("Invalid {}: {:?}", name, value)))
}

/// `<appointment-id> [--notes NOTES...]`
fn parse_status_change(
    args: &mut impl Iterator<Item = String>,
) -> BookingResult<(i64, Option<String>)> {
    let appointment_id = parse_id(&next_arg(args, "appointment-id")?, "appointment id")?;
    let notes = match args.next().as_deref() {
        None => None,
        Some("--notes") => {
            let notes = args.collect::<Vec<_>>().join(" ");
            if notes.trim().is_empty() {
                return Err(usage_error("Missing <notes>"));
            }
            Some(notes)
        }
        Some(other) => return Err(usage_error(format!("Unknown option {}", other))),
    };
    Ok((appointment_id, notes))
}

impl Command {
    /// Parses the arguments following the program name.
    pub fn parse<I>(args: I) -> BookingResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(command) = args.next() else {
            return Ok(Command::Help);
        };

        match command.as_str() {
            "profile" => Ok(Command::Profile),
            "search" => {
                let mut search = DoctorSearch::default();
                while let Some(flag) = args.next() {
                    match flag.as_str() {
                        "--name" => search.name = Some(next_arg(&mut args, "name")?),
                        "--specialization" => {
                            search.specialization = Some(next_arg(&mut args, "specialization")?)
                        }
                        other => return Err(usage_error(format!("Unknown option {}", other))),
                    }
                }
                Ok(Command::Search(search))
            }
            "doctor" => Ok(Command::Doctor {
                doctor_id: parse_uuid(&next_arg(&mut args, "doctor-id")?, "doctor id")?,
            }),
            "slots" => Ok(Command::Slots {
                doctor_id: parse_uuid(&next_arg(&mut args, "doctor-id")?, "doctor id")?,
            }),
            "book" => {
                let doctor_id = parse_uuid(&next_arg(&mut args, "doctor-id")?, "doctor id")?;
                let raw_date = next_arg(&mut args, "date")?;
                let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|_| {
                    BookingError::Validation(format!("Invalid date: {:?}", raw_date))
                })?;
                let time = parse_time_of_day(&next_arg(&mut args, "time")?)?;
                let reason = args.collect::<Vec<_>>().join(" ");
                Ok(Command::Book {
                    doctor_id,
                    date,
                    time,
                    reason,
                })
            }
            "appointments" => Ok(Command::Appointments),
            "cancel" => Ok(Command::Cancel {
                appointment_id: parse_id(&next_arg(&mut args, "appointment-id")?, "appointment id")?,
            }),
            "confirm" => {
                let (appointment_id, notes) = parse_status_change(&mut args)?;
                Ok(Command::Confirm {
                    appointment_id,
                    notes,
                })
            }
            "complete" => {
                let (appointment_id, notes) = parse_status_change(&mut args)?;
                Ok(Command::Complete {
                    appointment_id,
                    notes,
                })
            }
            "records" => Ok(Command::Records),
            "availability" => match args.next().as_deref() {
                None => Ok(Command::Availability),
                Some("add") => {
                    let day = next_arg(&mut args, "day")?;
                    let start = next_arg(&mut args, "start")?;
                    let end = next_arg(&mut args, "end")?;
                    Ok(Command::AddAvailability(AvailabilityWindow::parse(
                        &day, &start, &end,
                    )?))
                }
                Some("remove") => Ok(Command::RemoveAvailability {
                    availability_id: parse_id(
                        &next_arg(&mut args, "availability-id")?,
                        "availability id",
                    )?,
                }),
                Some(other) => Err(usage_error(format!("Unknown availability action {}", other))),
            },
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(usage_error(format!("Unknown command {}", other))),
        }
    }
}

/// Runs a command and returns the text to print.
pub async fn run<A: BookingApi>(
    flow: &BookingFlow<A>,
    command: Command,
    scope: ScopeKind,
    today: NaiveDate,
) -> BookingResult<String> {
    match command {
        Command::Help => Ok(USAGE.to_string()),
        Command::Profile => {
            let profile = flow.api().profile().await?;
            Ok(format_profile(&profile))
        }
        Command::Search(search) => {
            let doctors = flow.api().search_doctors(&search).await?;
            Ok(format_doctor_list(&doctors))
        }
        Command::Doctor { doctor_id } => {
            let doctor = flow.api().get_doctor(doctor_id).await?;
            Ok(format_doctor(&doctor))
        }
        Command::Slots { doctor_id } => {
            let doctor = flow.api().get_doctor(doctor_id).await?;
            let outcome = flow
                .load_slots(doctor_id, scope.scope_for(doctor_id), today)
                .await?;
            Ok(format!(
                "Open slots with {}\n\n{}",
                doctor.display_name(),
                format_slot_outcome(&outcome)
            ))
        }
        Command::Book {
            doctor_id,
            date,
            time,
            reason,
        } => {
            let outcome = flow
                .book_at(doctor_id, date, time, &reason, scope.scope_for(doctor_id), today)
                .await?;
            Ok(format_booking_outcome(&outcome))
        }
        Command::Appointments => {
            let appointments = flow.api().appointments(AppointmentScope::Mine).await?;
            Ok(format_appointments(&appointments))
        }
        Command::Cancel { appointment_id } => {
            let appointment = flow.cancel(appointment_id).await?;
            Ok(format!(
                "Cancelled appointment #{} on {} at {}",
                appointment.id,
                format_date(appointment.date),
                format_time(appointment.time)
            ))
        }
        Command::Confirm {
            appointment_id,
            notes,
        } => {
            let appointment = flow
                .update_status(appointment_id, AppointmentStatus::Confirmed, notes.as_deref())
                .await?;
            Ok(format_status_change(&appointment))
        }
        Command::Complete {
            appointment_id,
            notes,
        } => {
            let appointment = flow
                .update_status(appointment_id, AppointmentStatus::Completed, notes.as_deref())
                .await?;
            Ok(format_status_change(&appointment))
        }
        Command::Records => {
            let records = flow.api().my_records().await?;
            Ok(format_records(&records))
        }
        Command::Availability => {
            let records = flow.api().my_availability().await?;
            Ok(format_availability(&records))
        }
        Command::AddAvailability(window) => {
            let record = flow
                .api()
                .add_availability(&CreateAvailabilityRequest::from(window))
                .await?;
            Ok(format!(
                "Added availability #{}: {} {} - {}",
                record.id,
                window.day_of_week,
                format_time(window.start_time),
                format_time(window.end_time)
            ))
        }
        Command::RemoveAvailability { availability_id } => {
            flow.api().delete_availability(availability_id).await?;
            Ok(format!("Removed availability #{}", availability_id))
        }
    }
}

/// 12-hour clock, e.g. `9:30 AM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// e.g. `Mon, Jan 01`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %d").to_string()
}

pub fn format_slot_outcome(outcome: &SlotOutcome) -> String {
    if let Some(message) = outcome.empty_message() {
        return message;
    }

    let mut lines = Vec::new();
    let mut current: Option<NaiveDate> = None;
    let mut times = Vec::new();
    for slot in outcome.slots() {
        if current != Some(slot.date) {
            if let Some(date) = current {
                lines.push(format!("{}\n  {}", format_date(date), times.join(", ")));
                times.clear();
            }
            current = Some(slot.date);
        }
        times.push(format_time(slot.time));
    }
    if let Some(date) = current {
        lines.push(format!("{}\n  {}", format_date(date), times.join(", ")));
    }

    lines.join("\n")
}

pub fn format_booking_outcome(outcome: &BookingOutcome) -> String {
    match outcome {
        BookingOutcome::Booked(appointment) => format!(
            "Booked appointment #{} on {} at {} ({})",
            appointment.id,
            format_date(appointment.date),
            format_time(appointment.time),
            appointment.status
        ),
        BookingOutcome::SlotTaken { slot, refreshed } => format!(
            "The slot on {} at {} was just taken. Current openings:\n\n{}",
            format_date(slot.date),
            format_time(slot.time),
            format_slot_outcome(refreshed)
        ),
    }
}

pub fn format_doctor(doctor: &Doctor) -> String {
    let mut description = format!("{}\n", doctor.display_name());
    description.push_str(&format!(
        "Specialization: {}\n",
        doctor.specialization.as_deref().unwrap_or("General practice")
    ));
    description.push_str(&format!("License: {}", doctor.license_number));
    if let Some(years) = doctor.years_of_experience {
        description.push_str(&format!("\nExperience: {} years", years));
    }
    if let Some(fee) = &doctor.consultation_fee {
        description.push_str(&format!("\nConsultation fee: {}", fee));
    }
    if let Some(bio) = &doctor.bio {
        description.push_str(&format!("\n\n{}", bio));
    }
    description
}

pub fn format_doctor_list(doctors: &[Doctor]) -> String {
    if doctors.is_empty() {
        return "No doctors match your search".to_string();
    }

    doctors
        .iter()
        .map(|doctor| {
            format!(
                "{} ({})  {}",
                doctor.display_name(),
                doctor.specialization.as_deref().unwrap_or("General practice"),
                doctor.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_appointments(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return "You have no appointments yet".to_string();
    }

    appointments
        .iter()
        .map(|appointment| {
            format!(
                "#{}  {} {}  [{}]  Dr. {} with {}: {}",
                appointment.id,
                format_date(appointment.date),
                format_time(appointment.time),
                appointment.status,
                appointment.doctor_name,
                appointment.patient_name,
                appointment.reason
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_availability(records: &[AvailabilityRecord]) -> String {
    let mut sections = Vec::new();
    for day in DayOfWeek::ALL {
        let mut section = day.to_string();
        let entries: Vec<String> = records
            .iter()
            .filter(|record| record.day_of_week.parse::<DayOfWeek>().ok() == Some(day))
            .map(|record| {
                let span = match (
                    parse_time_of_day(&record.start_time),
                    parse_time_of_day(&record.end_time),
                ) {
                    (Ok(start), Ok(end)) => format!("{} - {}", format_time(start), format_time(end)),
                    _ => format!("{} - {}", record.start_time, record.end_time),
                };
                if record.is_available {
                    format!("  #{}  {}", record.id, span)
                } else {
                    format!("  #{}  {} (disabled)", record.id, span)
                }
            })
            .collect();

        if entries.is_empty() {
            section.push_str("\n  No availability set");
        } else {
            section.push('\n');
            section.push_str(&entries.join("\n"));
        }
        sections.push(section);
    }
    sections.join("\n")
}

pub fn format_status_change(appointment: &Appointment) -> String {
    let mut message = format!(
        "Appointment #{} on {} at {} is now {}",
        appointment.id,
        format_date(appointment.date),
        format_time(appointment.time),
        appointment.status
    );
    if let Some(notes) = &appointment.notes {
        message.push_str(&format!("\nNotes: {}", notes));
    }
    message
}

pub fn format_profile(profile: &UserProfile) -> String {
    let mut description = format!(
        "{}\nEmail: {}\nRole: {}\nMember since: {}",
        profile.full_name(),
        profile.email,
        profile.role,
        profile.created_at.format("%b %d, %Y")
    );
    if !profile.is_active {
        description.push_str("\nThis account is inactive");
    }
    description
}

pub fn format_records(records: &[MedicalRecord]) -> String {
    if records.is_empty() {
        return "You have no medical records yet".to_string();
    }

    records
        .iter()
        .map(|record| {
            let mut entry = format!(
                "{}  {}  (Dr. {})\n  Diagnosis: {}\n  Treatment: {}",
                record.date.format("%b %d, %Y"),
                record.title,
                record.doctor_name,
                record.diagnosis,
                record.treatment
            );
            if let Some(prescription) = &record.prescription {
                entry.push_str(&format!("\n  Prescription: {}", prescription));
            }
            if let Some(notes) = &record.notes {
                entry.push_str(&format!("\n  Notes: {}", notes));
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
