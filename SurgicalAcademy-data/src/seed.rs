//! Sample data for development databases.
//!
//! Every insert is keyed on a natural key (slug, email, FHIR id or a unique
//! pair), so running the seed twice leaves the database unchanged. The whole
//! run happens in one transaction.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension, Transaction};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::DatabasePool;
use crate::models::{Difficulty, NewCourse, NewFhirResource, NewUser, UserRole};
use crate::repository::errors::RepositoryError;
use crate::repository::{course_slug_exists, insert_course, insert_resource, insert_user};

/// Login credentials of a seeded account
#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub full_name: &'static str,
    pub name: &'static str,
    pub role: UserRole,
    pub specialization: Option<&'static str>,
    pub institution: Option<&'static str>,
    pub bio: Option<&'static str>,
}

pub const ADMIN_EMAIL: &str = "prof.sushkov@surgical-platform.com";
const TEACHER_ONCOLOGY: &str = "teacher1@surgical-platform.com";
const TEACHER_EMERGENCY: &str = "teacher2@surgical-platform.com";
const STUDENT_SENIOR: &str = "student1@surgical-platform.com";
const STUDENT_RESIDENT: &str = "student2@surgical-platform.com";

pub const SEED_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        email: ADMIN_EMAIL,
        password: "admin123",
        full_name: "Профессор Сергей Валентинович Сушков",
        name: "Проф. С.В. Сушков",
        role: UserRole::Admin,
        specialization: Some("Хирургия, Гастроэнтерология"),
        institution: Some("Медицинский университет"),
        bio: Some(
            "Профессор хирургии с 40-летним опытом, специалист в области гастроэнтерологии и минимально инвазивной хирургии.",
        ),
    },
    SeedAccount {
        email: "john@doe.com",
        password: "johndoe123",
        full_name: "John Doe",
        name: "John Doe",
        role: UserRole::Admin,
        specialization: None,
        institution: None,
        bio: None,
    },
    SeedAccount {
        email: TEACHER_ONCOLOGY,
        password: "teacher123",
        full_name: "Доктор Анна Петрова",
        name: "Д-р А. Петрова",
        role: UserRole::Teacher,
        specialization: Some("Онкохирургия"),
        institution: Some("Медицинский центр"),
        bio: None,
    },
    SeedAccount {
        email: TEACHER_EMERGENCY,
        password: "teacher123",
        full_name: "Доктор Михаил Иванов",
        name: "Д-р М. Иванов",
        role: UserRole::Teacher,
        specialization: Some("Экстренная хирургия"),
        institution: Some("Городская больница"),
        bio: None,
    },
    SeedAccount {
        email: STUDENT_SENIOR,
        password: "student123",
        full_name: "Елена Смирнова",
        name: "Елена Смирнова",
        role: UserRole::Student,
        specialization: Some("Студент 5 курса"),
        institution: Some("Медицинский университет"),
        bio: None,
    },
    SeedAccount {
        email: STUDENT_RESIDENT,
        password: "student123",
        full_name: "Алексей Козлов",
        name: "Алексей Козлов",
        role: UserRole::Student,
        specialization: Some("Ординатор 1 года"),
        institution: Some("Медицинский центр"),
        bio: None,
    },
];

/// (name, slug, description, color, icon)
const CATEGORIES: &[(&str, &str, &str, &str, &str)] = &[
    ("Гастроэнтерология", "gastroenterology", "Хирургия желудочно-кишечного тракта", "#10B981", "🫀"),
    ("Онкохирургия", "oncology", "Хирургическое лечение онкологических заболеваний", "#F59E0B", "🔬"),
    ("Общая хирургия", "general-surgery", "Основы хирургических вмешательств", "#3B82F6", "⚕️"),
    ("Экстренная хирургия", "emergency-surgery", "Неотложные хирургические вмешательства", "#EF4444", "🚨"),
];

/// (name, slug, color)
const TAGS: &[(&str, &str, &str)] = &[
    ("Лапароскопия", "laparoscopy", "#3B82F6"),
    ("Малоинвазивная хирургия", "minimally-invasive", "#10B981"),
    ("Экстренная помощь", "emergency", "#EF4444"),
    ("Робот-ассистированная хирургия", "robotic-surgery", "#8B5CF6"),
];

struct SeedLesson {
    title: &'static str,
    slug: &'static str,
    description: &'static str,
    content: &'static str,
    duration: u32,
}

struct SeedCourse {
    title: &'static str,
    slug: &'static str,
    description: &'static str,
    short_description: &'static str,
    difficulty: Difficulty,
    duration: u32,
    featured: bool,
    author: &'static str,
    category: &'static str,
    prerequisites: &'static str,
    objectives: &'static [&'static str],
    lessons: &'static [SeedLesson],
    tags: &'static [&'static str],
}

const COURSES: &[SeedCourse] = &[
    SeedCourse {
        title: "Основы лапароскопической холецистэктомии",
        slug: "laparoscopic-cholecystectomy-basics",
        description: "Полный курс по технике выполнения лапароскопической холецистэктомии, включая показания, противопоказания, технические особенности и возможные осложнения.",
        short_description: "Изучите технику безопасной лапароскопической холецистэктомии",
        difficulty: Difficulty::Intermediate,
        duration: 8,
        featured: true,
        author: ADMIN_EMAIL,
        category: "gastroenterology",
        prerequisites: "Базовые знания анатомии и общей хирургии",
        objectives: &[
            "Освоить технику лапароскопической холецистэктомии",
            "Изучить анатомические ориентиры",
            "Научиться предотвращать осложнения",
        ],
        lessons: &[
            SeedLesson {
                title: "Анатомия желчного пузыря и желчевыводящих путей",
                slug: "gallbladder-anatomy",
                description: "Детальное изучение анатомии для безопасной операции",
                content: "В этом уроке мы подробно рассмотрим анатомию желчного пузыря...",
                duration: 45,
            },
            SeedLesson {
                title: "Показания и противопоказания к лапароскопической холецистэктомии",
                slug: "indications-contraindications",
                description: "Критерии отбора пациентов для лапароскопического доступа",
                content: "Показания к лапароскопической холецистэктомии включают...",
                duration: 30,
            },
            SeedLesson {
                title: "Техника операции: пошаговое руководство",
                slug: "surgical-technique",
                description: "Детальное описание всех этапов операции",
                content: "Операция начинается с создания пневмоперитонеума...",
                duration: 90,
            },
            SeedLesson {
                title: "Осложнения и их профилактика",
                slug: "complications-prevention",
                description: "Возможные осложнения и способы их предотвращения",
                content: "Основные осложнения лапароскопической холецистэктомии...",
                duration: 60,
            },
        ],
        tags: &["laparoscopy", "minimally-invasive"],
    },
    SeedCourse {
        title: "Экстренная абдоминальная хирургия",
        slug: "emergency-abdominal-surgery",
        description: "Комплексный курс по диагностике и лечению острых хирургических заболеваний органов брюшной полости.",
        short_description: "Диагностика и лечение острого живота",
        difficulty: Difficulty::Advanced,
        duration: 12,
        featured: true,
        author: TEACHER_EMERGENCY,
        category: "emergency-surgery",
        prerequisites: "Опыт работы в хирургии не менее 2 лет",
        objectives: &[
            "Быстрая диагностика острого живота",
            "Выбор оптимальной тактики лечения",
            "Освоение экстренных операций",
        ],
        lessons: &[
            SeedLesson {
                title: "Синдром острого живота: дифференциальная диагностика",
                slug: "acute-abdomen-diagnosis",
                description: "Алгоритм диагностики при остром животе",
                content: "Острый живот - собирательное понятие...",
                duration: 60,
            },
            SeedLesson {
                title: "Острый аппендицит: диагностика и лечение",
                slug: "acute-appendicitis",
                description: "Современные подходы к лечению аппендицита",
                content: "Острый аппендицит остается одним из самых частых...",
                duration: 45,
            },
            SeedLesson {
                title: "Перфоративная язва: экстренная тактика",
                slug: "perforated-ulcer",
                description: "Диагностика и хирургическое лечение перфоративной язвы",
                content: "Перфорация язвы требует немедленного вмешательства...",
                duration: 75,
            },
        ],
        tags: &["emergency"],
    },
    SeedCourse {
        title: "Онкохирургия желудочно-кишечного тракта",
        slug: "gi-oncosurgery",
        description: "Специализированный курс по хирургическому лечению злокачественных новообразований ЖКТ.",
        short_description: "Хирургическое лечение онкологических заболеваний ЖКТ",
        difficulty: Difficulty::Expert,
        duration: 16,
        featured: false,
        author: TEACHER_ONCOLOGY,
        category: "oncology",
        prerequisites: "Сертификат онколога или хирурга",
        objectives: &[
            "Принципы радикальной онкохирургии",
            "Современные реконструктивные методики",
            "Мультидисциплинарный подход",
        ],
        lessons: &[
            SeedLesson {
                title: "Принципы онкологической хирургии",
                slug: "oncological-principles",
                description: "Основные принципы радикального лечения",
                content: "Онкологическая хирургия требует соблюдения определенных принципов...",
                duration: 90,
            },
            SeedLesson {
                title: "Рак желудка: хирургическое лечение",
                slug: "gastric-cancer-surgery",
                description: "Техника гастрэктомии и резекции желудка",
                content: "Хирургическое лечение рака желудка включает...",
                duration: 120,
            },
        ],
        tags: &["robotic-surgery"],
    },
];

struct SeedArticle {
    title: &'static str,
    slug: &'static str,
    content: &'static str,
    excerpt: &'static str,
    featured: bool,
    read_time: u32,
    author: &'static str,
    category: &'static str,
}

const ARTICLES: &[SeedArticle] = &[
    SeedArticle {
        title: "Робот-ассистированная хирургия: настоящее и будущее",
        slug: "robotic-surgery-present-future",
        content: r#"# Робот-ассистированная хирургия: настоящее и будущее

Робот-ассистированная хирургия представляет собой революционный подход в современной медицине,
который значительно расширяет возможности хирургов и улучшает результаты лечения пациентов.

## Преимущества робот-ассистированной хирургии

1. **Высокая точность движений** - роботические системы обеспечивают точность до миллиметра
2. **Трехмерная визуализация** - хирург получает детальное изображение операционного поля
3. **Устранение тремора** - система фильтрует естественные колебания рук хирурга
4. **Минимальная инвазивность** - значительно меньшие разрезы по сравнению с открытой хирургией

## Применение в различных областях

### Урология
- Радикальная простатэктомия
- Резекция почки
- Реконструктивные операции на мочевыводящих путях

### Гинекология
- Гистерэктомия
- Миомэктомия
- Лечение эндометриоза

### Общая хирургия
- Холецистэктомия
- Резекции кишечника
- Антирефлюксные операции

## Будущее робот-ассистированной хирургии

Развитие технологий искусственного интеллекта и машинного обучения открывает новые горизонты:

- Автономные хирургические системы
- Интеграция с системами навигации
- Дистанционная хирургия (телехирургия)
- Персонализированные хирургические планы на основе ИИ

## Заключение

Робот-ассистированная хирургия продолжает эволюционировать, предлагая хирургам новые инструменты
для более точного и безопасного лечения пациентов. Важно отметить, что технология не заменяет
хирурга, а расширяет его возможности и повышает качество медицинской помощи.
"#,
        excerpt: "Обзор современных достижений и перспектив развития робот-ассистированной хирургии",
        featured: true,
        read_time: 8,
        author: ADMIN_EMAIL,
        category: "general-surgery",
    },
    SeedArticle {
        title: "Минимально инвазивная хирургия в лечении грыж",
        slug: "minimally-invasive-hernia-surgery",
        content: r#"# Минимально инвазивная хирургия в лечении грыж

Минимально инвазивная хирургия произвела революцию в лечении грыж передней брюшной стенки,
предлагая пациентам менее болезненные процедуры с быстрым восстановлением.

## Типы грыж, поддающихся минимально инвазивному лечению

### Паховые грыжи
- TEP (Total Extraperitoneal) операция
- TAPP (Trans Abdominal Pre Peritoneal) операция

### Вентральные грыжи
- Лапароскопическая пластика с сеткой
- Роботическая герниопластика

## Преимущества лапароскопического подхода

1. **Уменьшение болевого синдрома**
2. **Быстрое восстановление**
3. **Минимальные рубцы**
4. **Низкий риск раневых осложнений**
5. **Возможность лечения двусторонних грыж одномоментно**

## Показания и противопоказания

### Показания:
- Рецидивные грыжи после открытых операций
- Двусторонние паховые грыжи
- Грыжи у спортсменов

### Противопоказания:
- Тяжелые спайки брюшной полости
- Коагулопатии
- Беременность

## Техника операции

Операция выполняется под общим наркозом с использованием CO2 для создания рабочего пространства.
Размещение портов должно обеспечивать оптимальную визуализацию и удобство работы инструментами.

## Послеоперационный период

Большинство пациентов могут быть выписаны в день операции или на следующий день.
Возвращение к обычной активности происходит значительно быстрее по сравнению с открытой хирургией.
"#,
        excerpt: "Современные методы минимально инвазивного лечения грыж передней брюшной стенки",
        featured: false,
        read_time: 6,
        author: TEACHER_ONCOLOGY,
        category: "general-surgery",
    },
];

/// (student, course slug, progress %, completed)
const ENROLLMENTS: &[(&str, &str, u32, bool)] = &[
    (STUDENT_SENIOR, "laparoscopic-cholecystectomy-basics", 75, false),
    (STUDENT_SENIOR, "emergency-abdominal-surgery", 25, false),
    (STUDENT_RESIDENT, "laparoscopic-cholecystectomy-basics", 100, true),
];

/// Rows inserted by one seed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub users: usize,
    pub tags: usize,
    pub courses: usize,
    pub articles: usize,
    pub enrollments: usize,
    pub fhir_resources: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == SeedReport::default()
    }
}

/// Insert the sample data set.
///
/// `password_hashes` maps each [`SEED_ACCOUNTS`] email to its stored password
/// hash; hashing belongs to the caller.
pub async fn seed_database(
    pool: &DatabasePool,
    password_hashes: HashMap<&'static str, String>,
) -> Result<SeedReport, RepositoryError> {
    pool.run(move |conn| {
        let tx = conn.transaction()?;
        let report = seed_all(&tx, &password_hashes)?;
        tx.commit()?;

        info!("Seed finished: {:?}", report);
        Ok(report)
    })
    .await
}

fn seed_all(
    tx: &Transaction<'_>,
    password_hashes: &HashMap<&'static str, String>,
) -> Result<SeedReport, RepositoryError> {
    let mut report = SeedReport::default();
    let now = Utc::now();

    let mut categories = HashMap::new();
    for (name, slug, description, color, icon) in CATEGORIES {
        report.categories += tx.execute(
            "INSERT OR IGNORE INTO categories (id, name, slug, description, color, icon, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![Uuid::new_v4().to_string(), name, slug, description, color, icon, now],
        )?;
        categories.insert(*slug, id_by(tx, "categories", "slug", slug)?);
    }

    let mut users = HashMap::new();
    for account in SEED_ACCOUNTS {
        let id = match lookup_id(tx, "users", "email", account.email)? {
            Some(id) => id,
            None => {
                let password_hash = password_hashes.get(account.email).cloned().ok_or_else(|| {
                    RepositoryError::NotFound(format!("password hash for {}", account.email))
                })?;
                let id = Uuid::new_v4().to_string();
                insert_user(tx, &id, &new_user(account, password_hash))?;
                report.users += 1;
                id
            }
        };
        users.insert(account.email, id);
    }

    let mut tags = HashMap::new();
    for (name, slug, color) in TAGS {
        report.tags += tx.execute(
            "INSERT OR IGNORE INTO tags (id, name, slug, color) VALUES (?1, ?2, ?3, ?4)",
            params![Uuid::new_v4().to_string(), name, slug, color],
        )?;
        tags.insert(*slug, id_by(tx, "tags", "slug", slug)?);
    }

    for course in COURSES {
        if course_slug_exists(tx, course.slug)? {
            debug!("Course {} already present", course.slug);
            continue;
        }

        let course_id = Uuid::new_v4().to_string();
        insert_course(
            tx,
            &course_id,
            &NewCourse {
                title: course.title.to_string(),
                slug: course.slug.to_string(),
                description: course.description.to_string(),
                short_description: Some(course.short_description.to_string()),
                cover_image: None,
                difficulty: course.difficulty,
                duration: Some(course.duration),
                prerequisites: Some(course.prerequisites.to_string()),
                learning_objectives: course.objectives.iter().map(|o| o.to_string()).collect(),
                published: true,
                featured: course.featured,
                author_id: required(&users, course.author)?,
                category_id: required(&categories, course.category)?,
            },
        )?;

        for (index, lesson) in course.lessons.iter().enumerate() {
            tx.execute(
                "INSERT INTO lessons (id, course_id, title, slug, description, content, position, duration,
                    published, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9)",
                params![
                    Uuid::new_v4().to_string(),
                    course_id,
                    lesson.title,
                    lesson.slug,
                    lesson.description,
                    lesson.content,
                    index + 1,
                    lesson.duration,
                    now,
                ],
            )?;
        }

        for tag in course.tags {
            tx.execute(
                "INSERT OR IGNORE INTO course_tags (course_id, tag_id) VALUES (?1, ?2)",
                params![course_id, required(&tags, tag)?],
            )?;
        }
        report.courses += 1;
    }

    for article in ARTICLES {
        if lookup_id(tx, "articles", "slug", article.slug)?.is_some() {
            continue;
        }

        report.articles += tx.execute(
            "INSERT INTO articles (id, title, slug, content, excerpt, published, featured, read_time,
                author_id, category_id, published_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8, ?9, ?10, ?10, ?10)",
            params![
                Uuid::new_v4().to_string(),
                article.title,
                article.slug,
                article.content,
                article.excerpt,
                article.featured,
                article.read_time,
                required(&users, article.author)?,
                required(&categories, article.category)?,
                now,
            ],
        )?;
    }

    for (student, course_slug, progress, completed) in ENROLLMENTS {
        let Some(course_id) = lookup_id(tx, "courses", "slug", course_slug)? else {
            continue;
        };
        let user_id = required(&users, student)?;
        let completed_at = completed.then_some(now);

        report.enrollments += tx.execute(
            "INSERT OR IGNORE INTO enrollments (id, user_id, course_id, progress, enrolled_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![Uuid::new_v4().to_string(), user_id, course_id, progress, now, completed_at],
        )?;
    }

    seed_progress(tx, &users)?;
    report.fhir_resources = seed_fhir(tx, &users)?;

    Ok(report)
}

/// Three of four lessons done in the cholecystectomy course
fn seed_progress(tx: &Transaction<'_>, users: &HashMap<&'static str, String>) -> Result<(), RepositoryError> {
    let Some(course_id) = lookup_id(tx, "courses", "slug", "laparoscopic-cholecystectomy-basics")? else {
        return Ok(());
    };

    let total_lessons: u32 = tx.query_row(
        "SELECT COUNT(*) FROM lessons WHERE course_id = ?1",
        [&course_id],
        |row| row.get(0),
    )?;

    tx.execute(
        "INSERT OR IGNORE INTO progress (id, user_id, course_id, completed_lessons, total_lessons,
            progress_percentage, last_accessed_at)
         VALUES (?1, ?2, ?3, 3, ?4, 75.0, ?5)",
        params![
            Uuid::new_v4().to_string(),
            required(users, STUDENT_SENIOR)?,
            course_id,
            total_lessons,
            Utc::now() - Duration::days(1),
        ],
    )?;

    Ok(())
}

fn seed_fhir(tx: &Transaction<'_>, users: &HashMap<&'static str, String>) -> Result<usize, RepositoryError> {
    let author_id = required(users, ADMIN_EMAIL)?;
    let resources = [
        (
            "Patient",
            "patient-demo-001",
            "active",
            json!({
                "resourceType": "Patient",
                "id": "patient-demo-001",
                "name": [{
                    "use": "official",
                    "family": "Петров",
                    "given": ["Николай", "Александрович"]
                }],
                "gender": "male",
                "birthDate": "1975-03-20",
                "address": [{
                    "use": "home",
                    "line": ["ул. Московская, 45"],
                    "city": "Санкт-Петербург",
                    "postalCode": "190000",
                    "country": "RU"
                }]
            }),
        ),
        (
            "Procedure",
            "procedure-demo-001",
            "completed",
            json!({
                "resourceType": "Procedure",
                "id": "procedure-demo-001",
                "status": "completed",
                "code": {
                    "coding": [{
                        "system": "http://snomed.info/sct",
                        "code": "80146002",
                        "display": "Appendectomy"
                    }],
                    "text": "Лапароскопическая аппендэктомия"
                },
                "subject": {
                    "reference": "Patient/patient-demo-001",
                    "display": "Петров Николай Александрович"
                },
                "performedDateTime": "2024-01-20T14:30:00Z",
                "performer": [{
                    "actor": {
                        "reference": "Practitioner/prof-sushkov",
                        "display": "Проф. Сергей Валентинович Сушков"
                    }
                }]
            }),
        ),
    ];

    let mut inserted = 0;
    for (resource_type, fhir_id, status, data) in resources {
        if lookup_id(tx, "fhir_resources", "fhir_id", fhir_id)?.is_some() {
            continue;
        }

        insert_resource(
            tx,
            &Uuid::new_v4().to_string(),
            &NewFhirResource {
                resource_type: resource_type.to_string(),
                fhir_id: Some(fhir_id.to_string()),
                data,
                status: Some(status.to_string()),
                author_id: Some(author_id.clone()),
                synced_at: None,
            },
        )?;
        inserted += 1;
    }

    Ok(inserted)
}

fn new_user(account: &SeedAccount, password_hash: String) -> NewUser {
    NewUser {
        email: account.email.to_string(),
        password_hash,
        full_name: account.full_name.to_string(),
        name: Some(account.name.to_string()),
        role: account.role,
        specialization: account.specialization.map(str::to_string),
        institution: account.institution.map(str::to_string),
        bio: account.bio.map(str::to_string),
    }
}

fn lookup_id(
    tx: &Transaction<'_>,
    table: &str,
    column: &str,
    value: &str,
) -> Result<Option<String>, RepositoryError> {
    let sql = format!("SELECT id FROM {} WHERE {} = ?1 LIMIT 1", table, column);
    Ok(tx.query_row(&sql, [value], |row| row.get(0)).optional()?)
}

fn id_by(tx: &Transaction<'_>, table: &str, column: &str, value: &str) -> Result<String, RepositoryError> {
    lookup_id(tx, table, column, value)?
        .ok_or_else(|| RepositoryError::NotFound(format!("{} {}", table, value)))
}

fn required(ids: &HashMap<&'static str, String>, key: &str) -> Result<String, RepositoryError> {
    ids.get(key)
        .cloned()
        .ok_or_else(|| RepositoryError::NotFound(format!("seed reference {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseFilter, PageRequest};
    use crate::repository::{CourseRepository, CourseRepositoryTrait, UserRepository, UserRepositoryTrait};

    fn fake_hashes() -> HashMap<&'static str, String> {
        SEED_ACCOUNTS
            .iter()
            .map(|account| (account.email, format!("hash:{}", account.password)))
            .collect()
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = DatabasePool::in_memory().unwrap();

        let first = seed_database(&pool, fake_hashes()).await.unwrap();
        assert_eq!(first.categories, 4);
        assert_eq!(first.users, 6);
        assert_eq!(first.tags, 4);
        assert_eq!(first.courses, 3);
        assert_eq!(first.articles, 2);
        assert_eq!(first.enrollments, 3);
        assert_eq!(first.fhir_resources, 2);

        let second = seed_database(&pool, fake_hashes()).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_seeded_courses_are_listed_featured_first() {
        let pool = DatabasePool::in_memory().unwrap();
        seed_database(&pool, fake_hashes()).await.unwrap();

        let courses = CourseRepository::new(pool.clone());
        let (listed, total) = courses
            .find(CourseFilter::default(), PageRequest::for_page(1, 12))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert!(listed[0].featured);
        assert!(!listed[2].featured);
        assert_eq!(listed[2].slug, "gi-oncosurgery");

        let detail = courses
            .find_published_by_slug("laparoscopic-cholecystectomy-basics".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.lessons.len(), 4);
        assert_eq!(detail.lessons[0].position, 1);
        assert_eq!(detail.tags.len(), 2);
        assert_eq!(detail.course.counts.enrollments, 2);

        let users = UserRepository::new(pool);
        let admin = users.find_by_email(ADMIN_EMAIL.to_string()).await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.password_hash.as_deref(), Some("hash:admin123"));
    }
}
