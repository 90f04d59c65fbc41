use chrono::{Datelike, NaiveDate, Weekday};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::app::AppState;
use crate::date::{to_iso_date, YearMonth};
use crate::grid::CalendarCell;
use crate::reminders::ReminderCollection;
use crate::types::{default_category, Reminder, View, CATEGORIES};

const APP_TITLE: &str = "Calendario de Recuerdo";

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Indexed from Sunday
const WEEKDAY_NAMES: [&str; 7] = [
    "domingo",
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
];

/// Indexed from Sunday
const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Marzo 2024"
pub fn month_title(month: YearMonth) -> String {
    format!(
        "{} {}",
        capitalize(MONTH_NAMES[(month.month() - 1) as usize]),
        month.year()
    )
}

/// "Viernes, 15 de marzo de 2024"
pub fn long_date(date: NaiveDate) -> String {
    let weekday = WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize];
    format!(
        "{}, {} de {} de {}",
        capitalize(weekday),
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// Column headers starting at `week_start`
pub fn weekday_headers(week_start: Weekday) -> Vec<&'static str> {
    let offset = week_start.num_days_from_sunday() as usize;
    (0..7)
        .map(|i| WEEKDAY_ABBREVIATIONS[(offset + i) % 7])
        .collect()
}

pub fn render_page(state: &AppState, today: NaiveDate) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (APP_TITLE) }
                style { (PreEscaped(CSS)) }
            }
            body {
                @if state.should_show_welcome() {
                    (render_welcome())
                } @else {
                    div.container {
                        header {
                            h1 { (APP_TITLE) }
                            p.tagline { "Agudiza tu mente, un recordatorio a la vez." }
                        }
                        (render_view_toggle(state.view))
                        main.panel {
                            @match state.view {
                                View::Calendar => { (render_calendar(state, today)) }
                                View::List => { (render_list(state.reminders())) }
                            }
                        }
                    }
                }
                @if let Some(date) = state.selected {
                    (render_modal(date, state.selected_reminder()))
                }
                footer {
                    p { "© " (today.year()) " " (APP_TITLE) ". Agudiza tu mente." }
                }
                script { (PreEscaped(JAVASCRIPT)) }
            }
        }
    }
}

fn render_welcome() -> Markup {
    html! {
        div.welcome {
            h1 { (APP_TITLE) }
            p.tagline { "¿Listo para poner a prueba tu memoria?" }
            div.welcome-actions {
                form method="post" action="/view" {
                    input type="hidden" name="view" value=(View::Calendar.as_str());
                    button.primary type="submit" { "Agregar Recordatorios" }
                }
                form method="post" action="/view" {
                    input type="hidden" name="view" value=(View::List.as_str());
                    button.outline type="submit" { "Revisar Recordatorios" }
                }
            }
        }
    }
}

fn render_view_toggle(active: View) -> Markup {
    html! {
        div.view-toggle {
            @for (view, label) in [
                (View::Calendar, "Calendario"),
                (View::List, "Mis Recordatorios"),
            ] {
                form method="post" action="/view" {
                    input type="hidden" name="view" value=(view.as_str());
                    button.toggle.active[view == active] type="submit" { (label) }
                }
            }
        }
    }
}

fn render_calendar(state: &AppState, today: NaiveDate) -> Markup {
    let view = state.month_view();
    html! {
        div.calendar {
            div.calendar-nav {
                form method="post" action="/month/prev" {
                    button.nav type="submit" aria-label="Mes anterior" { "‹" }
                }
                h2 #"month-title" { (month_title(view.month)) }
                form method="post" action="/month/next" {
                    button.nav type="submit" aria-label="Mes siguiente" { "›" }
                }
            }
            div.weekdays {
                @for name in weekday_headers(view.week_start) {
                    div { (name) }
                }
            }
            div.grid #"calendar-grid" {
                @for cell in &view.cells {
                    (render_cell(cell, state.reminder_on(cell.date), cell.date == today))
                }
            }
        }
    }
}

fn render_cell(cell: &CalendarCell, reminder: Option<&Reminder>, is_today: bool) -> Markup {
    let key = to_iso_date(cell.date);
    let content = html! {
        @if let Some(reminder) = reminder {
            span.icon aria-label={ "Icono de recordatorio: " (reminder.icon) } { (reminder.icon) }
        } @else {
            span { (cell.date.day()) }
        }
    };

    html! {
        @if cell.is_current_month {
            form.cell method="post" action="/select" {
                input type="hidden" name="date" value=(key);
                button.day.has-reminder[reminder.is_some()].today[is_today]
                    type="submit" data-date=(key) {
                    (content)
                }
            }
        } @else {
            div.cell {
                div.day.outside data-date=(key) { (content) }
            }
        }
    }
}

fn render_list(reminders: &ReminderCollection) -> Markup {
    html! {
        @if reminders.is_empty() {
            div.empty-state {
                h3 { "No tienes recordatorios" }
                p { "Ve a la vista de calendario para agregar tu primer desafío de memoria." }
            }
        } @else {
            h2.list-title { "Tus Desafíos de Memoria" }
            ul.reminder-list #"reminder-list" {
                @for reminder in reminders {
                    li.reminder-item data-date=(reminder.key()) {
                        span.icon aria-label={ "Ícono: " (reminder.icon) } { (reminder.icon) }
                        div {
                            p.reminder-date { (long_date(reminder.date)) }
                            p.reminder-label { "Recordatorio Misterioso" }
                        }
                    }
                }
            }
        }
    }
}

fn render_modal(date: NaiveDate, reminder: Option<&Reminder>) -> Markup {
    let key = to_iso_date(date);
    html! {
        div.modal-backdrop #"modal-backdrop" {
            div.modal role="dialog" aria-modal="true" {
                h2 { (long_date(date)) }
                @if let Some(reminder) = reminder {
                    p { "Tienes un recordatorio misterioso para este día. ¿Recuerdas qué es?" }
                    div.current-reminder {
                        span.big-icon { (reminder.icon) }
                        @if let Some(category) = reminder.category() {
                            span.category-name { (category.name) }
                        }
                    }
                    div.modal-actions {
                        form method="post" action="/close" {
                            button.text type="submit" { "Cerrar" }
                        }
                        form method="post" action="/reminders/remove" {
                            input type="hidden" name="date" value=(key);
                            button.danger type="submit" { "Eliminar" }
                        }
                    }
                } @else {
                    p { "Desafía tu memoria. Fija un recordatorio misterioso para este día." }
                    form method="post" action="/reminders" {
                        input type="hidden" name="date" value=(key);
                        p.picker-label { "Selecciona una categoría:" }
                        div.picker {
                            @for category in CATEGORIES {
                                label.category
                                    aria-label={ "Seleccionar categoría: " (category.name) } {
                                    input type="radio" name="icon" value=(category.icon)
                                        checked[category == default_category()];
                                    span.category-icon { (category.icon) }
                                    span.category-name { (category.name) }
                                }
                            }
                        }
                        div.modal-actions {
                            button.text type="submit" formaction="/close" { "Cancelar" }
                            button.primary type="submit" { "Fijar Recordatorio" }
                        }
                    }
                }
            }
        }
    }
}

const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: 'Roboto', -apple-system, BlinkMacSystemFont, sans-serif;
    background: #f1f5f9;
    color: #0f172a;
    min-height: 100vh;
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    padding: 16px 16px 64px;
}

h1 {
    color: #4f46e5;
    font-weight: 500;
    font-size: 3em;
    text-align: center;
}

.tagline {
    margin-top: 8px;
    color: #475569;
    font-size: 1.1em;
    text-align: center;
}

.welcome {
    text-align: center;
    animation: fade-in 0.5s cubic-bezier(0.4, 0, 0.2, 1) forwards;
}

.welcome-actions {
    display: flex;
    flex-wrap: wrap;
    gap: 16px;
    justify-content: center;
    margin-top: 32px;
}

.container {
    width: 100%;
    max-width: 42rem;
}

button {
    font: inherit;
    cursor: pointer;
    border: none;
    background: none;
}

.primary, .outline, .danger, .text {
    padding: 10px 20px;
    border-radius: 999px;
    font-weight: 500;
    text-transform: uppercase;
    letter-spacing: 0.05em;
}

.primary { background: #6366f1; color: #fff; }
.primary:hover { background: #4f46e5; }
.outline { border: 2px solid #6366f1; color: #6366f1; }
.danger { background: #ef4444; color: #fff; border-radius: 6px; }
.text { color: #6366f1; border-radius: 6px; }

.view-toggle {
    display: flex;
    gap: 4px;
    padding: 4px;
    margin: 24px auto;
    max-width: 24rem;
    background: #e2e8f0;
    border-radius: 999px;
}

.view-toggle form { flex: 1; }

.toggle {
    width: 100%;
    padding: 8px 16px;
    border-radius: 999px;
    color: #475569;
}

.toggle.active {
    background: #fff;
    color: #4f46e5;
    box-shadow: 0 1px 3px rgba(0,0,0,0.15);
}

.panel {
    background: #fff;
    border-radius: 16px;
    box-shadow: 0 10px 25px rgba(0,0,0,0.08);
    padding: 24px;
}

.calendar-nav {
    display: flex;
    align-items: center;
    justify-content: space-between;
    margin-bottom: 16px;
}

.calendar-nav h2 {
    font-weight: 500;
    width: 12rem;
    text-align: center;
}

.nav {
    font-size: 1.5em;
    width: 40px;
    height: 40px;
    border-radius: 50%;
    color: #475569;
}

.nav:hover { background: #e2e8f0; }

.weekdays, .grid {
    display: grid;
    grid-template-columns: repeat(7, 1fr);
    text-align: center;
}

.weekdays {
    color: #64748b;
    font-weight: 500;
    margin-bottom: 8px;
}

.grid { row-gap: 4px; }

.day {
    display: flex;
    align-items: center;
    justify-content: center;
    width: 40px;
    height: 40px;
    margin: 0 auto;
    border-radius: 50%;
    color: #334155;
}

button.day:hover { background: #e0e7ff; }

.day.has-reminder {
    background: #6366f1;
    color: #fff;
    font-weight: 500;
}

.day.today { border: 2px solid #6366f1; }
.day.has-reminder.today { box-shadow: 0 0 0 2px #fff, 0 0 0 4px #6366f1; border: none; }
.day.outside { color: #94a3b8; cursor: default; }

.icon { font-size: 1.2em; }

.list-title {
    font-size: 1.1em;
    font-weight: 500;
    margin-bottom: 16px;
}

.reminder-list { list-style: none; display: grid; gap: 12px; }

.reminder-item {
    display: flex;
    align-items: center;
    gap: 16px;
    padding: 16px;
    background: #f8fafc;
    border-radius: 8px;
}

.reminder-item .icon { font-size: 1.8em; }
.reminder-date { font-weight: 500; }
.reminder-label { color: #64748b; font-size: 0.9em; }

.empty-state {
    padding: 48px 16px;
    text-align: center;
    color: #64748b;
}

.empty-state h3 { color: #334155; font-weight: 500; margin-bottom: 8px; }

.modal-backdrop {
    position: fixed;
    inset: 0;
    background: rgba(0,0,0,0.6);
    display: flex;
    align-items: center;
    justify-content: center;
    padding: 16px;
    animation: fade-in 0.2s cubic-bezier(0.4, 0, 0.2, 1) forwards;
}

.modal {
    background: #fff;
    border-radius: 8px;
    width: 100%;
    max-width: 24rem;
    padding: 24px;
    animation: scale-up 0.2s cubic-bezier(0.4, 0, 0.2, 1) forwards;
}

.modal h2 { font-size: 1.25em; font-weight: 500; margin-bottom: 16px; }
.modal p { color: #475569; margin-bottom: 16px; }

.current-reminder {
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 8px;
    margin: 16px 0;
}

.big-icon { font-size: 4em; }

.picker {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 8px;
    padding: 8px;
    background: #f1f5f9;
    border-radius: 8px;
}

.category {
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 4px;
    padding: 8px;
    border-radius: 8px;
    cursor: pointer;
}

.category input { display: none; }
.category:has(input:checked) { background: #c7d2fe; }
.category-icon { font-size: 1.8em; }
.category-name { font-size: 0.75em; font-weight: 500; color: #334155; }

.modal-actions {
    display: flex;
    justify-content: flex-end;
    gap: 8px;
    margin-top: 32px;
}

footer {
    position: absolute;
    bottom: 16px;
    color: #64748b;
    font-size: 0.85em;
}

@keyframes fade-in {
    from { opacity: 0; transform: translateY(10px); }
    to { opacity: 1; transform: translateY(0); }
}

@keyframes scale-up {
    from { transform: scale(0.9); opacity: 0; }
    to { transform: scale(1); opacity: 1; }
}

@media (max-width: 640px) {
    h1 { font-size: 2.25em; }
    .panel { padding: 16px; }
}
"#;

const JAVASCRIPT: &str = r#"
// Clicking outside the dialog closes it
const backdrop = document.getElementById('modal-backdrop');
if (backdrop) {
    backdrop.addEventListener('click', function(event) {
        if (event.target !== backdrop) return;
        const form = document.createElement('form');
        form.method = 'post';
        form.action = '/close';
        document.body.appendChild(form);
        form.submit();
    });
}
"#;
